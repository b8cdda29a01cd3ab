//! Handlers for single URL shortening.

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use validator::{Validate, ValidateUrl};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::identity::CallerId;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL sent as a plain-text body.
///
/// # Endpoint
///
/// `POST /`
///
/// # Response
///
/// - **201 Created**: body is the new short URL
/// - **409 Conflict**: the URL was already shortened; body is the existing short URL
///
/// # Errors
///
/// Returns 400 Bad Request if the body is not a valid URL.
pub async fn shorten_text_handler(
    State(state): State<AppState>,
    Extension(CallerId(owner_id)): Extension<CallerId>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let url = body.trim().to_string();

    if !url.validate_url() {
        return Err(AppError::bad_request(
            "Invalid URL format",
            json!({ "url": url }),
        ));
    }

    let outcome = state.shortener.shorten(&url, &owner_id).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::CONFLICT
    };

    Ok((
        status,
        [(header::CONTENT_TYPE, "text/plain")],
        state.short_url(&outcome.key),
    ))
}

/// Shortens a URL sent as JSON.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "result": "http://localhost:8080/Ab3dE9xZ" }
/// ```
///
/// Status is **201 Created** for a new link and **409 Conflict** when the URL
/// was already shortened, in which case `result` holds the existing short URL.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(CallerId(owner_id)): Extension<CallerId>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let outcome = state.shortener.shorten(&payload.url, &owner_id).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::CONFLICT
    };

    Ok((
        status,
        Json(ShortenResponse {
            result: state.short_url(&outcome.key),
        }),
    ))
}
