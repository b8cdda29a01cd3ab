//! Handlers for liveness and health checks.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Checks that the storage backend answers.
///
/// # Endpoint
///
/// `GET /ping`
///
/// # Response Codes
///
/// - **200 OK**: storage reachable
/// - **500 Internal Server Error**: storage unreachable
pub async fn ping_handler(State(state): State<AppState>) -> StatusCode {
    match state.shortener.ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Reachable" },
///     "deletion_queue": { "status": "ok", "message": "4 workers, 0/1024 queued" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let deletion_queue = check_deletion_queue(&state).await;

    let all_healthy = storage.is_ok() && deletion_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            deletion_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.shortener.ping().await {
        Ok(()) => CheckStatus::ok("Reachable"),
        Err(e) => CheckStatus::error(format!("Storage error: {}", e)),
    }
}

/// Reports queue depth, or an error once the pool stopped accepting jobs.
async fn check_deletion_queue(state: &AppState) -> CheckStatus {
    let pool = state.shortener.deletion_pool();

    match pool.queued().await {
        Some(queued) => CheckStatus::ok(format!(
            "{} workers, {}/{} queued",
            pool.worker_count(),
            queued,
            pool.capacity()
        )),
        None => CheckStatus::error("Deletion queue is closed"),
    }
}
