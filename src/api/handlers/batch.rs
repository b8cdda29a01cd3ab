//! Handler for batch shortening.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::batch::{BatchItemRequest, BatchItemResponse};
use crate::api::dto::shorten::ShortenResponse;
use crate::api::middleware::identity::CallerId;
use crate::application::services::BatchRequestItem;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a list of URLs in one all-or-nothing operation.
///
/// # Endpoint
///
/// `POST /api/shorten/batch`
///
/// # Request Body
///
/// ```json
/// [
///   { "correlation_id": "1", "original_url": "https://a.example" },
///   { "correlation_id": "2", "original_url": "https://b.example" }
/// ]
/// ```
///
/// # Response
///
/// **201 Created** with one `{correlation_id, short_url}` per request, in
/// request order.
///
/// If any URL is already shortened, or appears twice in the batch, nothing
/// is stored and the response is **409 Conflict** with
/// `{ "result": "<existing short URL>" }`.
///
/// # Errors
///
/// Returns 400 Bad Request if the batch is empty or an item is invalid.
pub async fn shorten_batch_handler(
    State(state): State<AppState>,
    Extension(CallerId(owner_id)): Extension<CallerId>,
    Json(payload): Json<Vec<BatchItemRequest>>,
) -> Result<Response, AppError> {
    if payload.is_empty() {
        return Err(AppError::bad_request(
            "Batch must contain at least one URL",
            json!({}),
        ));
    }

    for item in &payload {
        item.validate()?;
    }

    let requests = payload
        .into_iter()
        .map(|item| BatchRequestItem {
            correlation_id: item.correlation_id,
            original_url: item.original_url,
        })
        .collect();

    let outcome = state.shortener.shorten_batch(requests, &owner_id).await?;

    if let Some(key) = outcome.conflict_key {
        let body = ShortenResponse {
            result: state.short_url(&key),
        };
        return Ok((StatusCode::CONFLICT, Json(body)).into_response());
    }

    let items: Vec<BatchItemResponse> = outcome
        .items
        .into_iter()
        .map(|item| BatchItemResponse {
            short_url: state.short_url(&item.key),
            correlation_id: item.correlation_id,
        })
        .collect();

    Ok((StatusCode::CREATED, Json(items)).into_response())
}
