//! Handler for internal statistics.

use axum::{Json, extract::State, http::HeaderMap};
use serde_json::json;

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the client address, set by the fronting proxy.
pub const REAL_IP_HEADER: &str = "x-real-ip";

/// Returns the number of live links and of distinct users owning them.
///
/// # Endpoint
///
/// `GET /api/internal/stats`
///
/// # Access
///
/// Only callers whose `X-Real-IP` falls inside `TRUSTED_SUBNET` are served.
/// With no subnet configured the endpoint always answers **403 Forbidden**.
///
/// # Response
///
/// ```json
/// { "urls": 42, "users": 7 }
/// ```
pub async fn internal_stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    let origin = headers
        .get(REAL_IP_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !state.trusted_subnet.allows(origin) {
        return Err(AppError::forbidden(
            "Caller is outside the trusted subnet",
            json!({ "origin": origin }),
        ));
    }

    let stats = state.shortener.stats().await?;

    Ok(Json(stats.into()))
}
