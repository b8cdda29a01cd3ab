//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /`        - Shorten a plain-text URL
//! - `GET  /{key}`   - Short link redirect
//! - `GET  /ping`    - Storage liveness
//! - `GET  /health`  - Storage and deletion queue checks
//! - `/api/*`        - JSON API
//!
//! # Middleware
//!
//! - **Caller identity** - `user_id` cookie read or issued for every request
//! - **Compression** - gzip responses and gzip request bodies
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, ping_handler, redirect_handler, shorten_text_handler};
use crate::api::middleware::{identity, tracing};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::compression::CompressionLayer;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// All routes and middleware, without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(shorten_text_handler))
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .route("/{key}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(middleware::from_fn(identity::layer))
        .layer(RequestDecompressionLayer::new().gzip(true))
        .layer(CompressionLayer::new().gzip(true))
        .layer(tracing::layer())
}
