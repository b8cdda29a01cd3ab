//! Handlers for the caller's own links.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::urls::UserUrlItem;
use crate::api::middleware::identity::CallerId;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the links created by the caller.
///
/// # Endpoint
///
/// `GET /api/user/urls`
///
/// # Response
///
/// - **200 OK** with `[{ "short_url": "...", "original_url": "..." }]`
/// - **204 No Content** when the caller has no live links
///
/// Deleted links are not listed.
pub async fn list_user_urls_handler(
    State(state): State<AppState>,
    Extension(CallerId(owner_id)): Extension<CallerId>,
) -> Result<Response, AppError> {
    let links = state.shortener.list_for_owner(&owner_id).await?;

    if links.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let items: Vec<UserUrlItem> = links
        .into_iter()
        .map(|link| UserUrlItem {
            short_url: state.short_url(&link.short_key),
            original_url: link.original_url,
        })
        .collect();

    Ok(Json(items).into_response())
}

/// Queues deletion of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/user/urls`
///
/// # Request Body
///
/// ```json
/// ["Ab3dE9xZ", "Qw7rT2pL"]
/// ```
///
/// # Response
///
/// **202 Accepted** as soon as the keys are queued. Deletion happens in the
/// background; keys owned by someone else are skipped silently.
///
/// # Errors
///
/// Returns 503 Service Unavailable while the server is shutting down.
pub async fn delete_user_urls_handler(
    State(state): State<AppState>,
    Extension(CallerId(owner_id)): Extension<CallerId>,
    Json(keys): Json<Vec<String>>,
) -> Result<StatusCode, AppError> {
    state.shortener.request_deletion(&owner_id, &keys).await?;

    Ok(StatusCode::ACCEPTED)
}
