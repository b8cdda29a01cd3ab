//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use serde_json::json;
use tracing::debug;

use crate::application::services::Resolution;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its original URL.
///
/// # Endpoint
///
/// `GET /{key}`
///
/// # Response Codes
///
/// - **307 Temporary Redirect** with `Location` set to the original URL
/// - **410 Gone** if the link was deleted by its owner
/// - **404 Not Found** if the key was never issued
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    match state.shortener.resolve(&key).await? {
        Resolution::Active(url) => {
            debug!(%key, %url, "Redirecting");
            Ok(Redirect::temporary(&url))
        }
        Resolution::Deleted => Err(AppError::gone(
            "Short link was deleted",
            json!({ "key": key }),
        )),
        Resolution::NotFound => Err(AppError::not_found(
            "Short link not found",
            json!({ "key": key }),
        )),
    }
}
