mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_ping_ok() {
    let server = common::create_test_server(common::create_test_state());

    let response = server.get("/ping").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_health_reports_components() {
    let server = common::create_test_server(common::create_test_state());

    let response = server.get("/health").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["status"], "ok");
    assert_eq!(body["checks"]["deletion_queue"]["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_degraded_after_pool_shutdown() {
    let state = common::create_test_state();
    let server = common::create_test_server(state.clone());

    state.shortener.deletion_pool().shutdown().await;

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["deletion_queue"]["status"], "error");
}
