//! HTTP request/response tracing middleware.

use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type MakeRequestSpan<B> = fn(&Request<B>) -> Span;

/// Creates a tracing middleware for HTTP requests.
///
/// Each request gets an `INFO` span carrying the method and path. Responses
/// are logged with status and latency in milliseconds; 5xx responses are
/// additionally reported at `ERROR` level.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST path=/api/shorten}: finished processing request latency=3 ms status=201
/// ```
pub fn layer<B>() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeRequestSpan<B>> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as MakeRequestSpan<B>)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}
