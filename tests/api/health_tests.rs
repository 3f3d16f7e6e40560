//! Health and Metrics Tests

use axum::http::StatusCode;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    let app = TestApp::new();

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
}
