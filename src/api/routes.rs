//! API route configuration.
//!
//! Every API endpoint runs behind the caller identity middleware
//! ([`crate::api::middleware::identity`]), applied in [`crate::routes::app_router`].

use crate::api::handlers::{
    delete_user_urls_handler, internal_stats_handler, list_user_urls_handler,
    shorten_batch_handler, shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /shorten`         - Shorten one URL (JSON)
/// - `POST   /shorten/batch`   - Shorten many URLs, all or nothing
/// - `GET    /user/urls`       - List the caller's links
/// - `DELETE /user/urls`       - Queue deletion of the caller's links
/// - `GET    /internal/stats`  - Link and user counts (trusted subnet only)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/batch", post(shorten_batch_handler))
        .route(
            "/user/urls",
            get(list_user_urls_handler).delete(delete_user_urls_handler),
        )
        .route("/internal/stats", get(internal_stats_handler))
}
