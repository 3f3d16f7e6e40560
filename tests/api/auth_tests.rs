//! Authentication API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn register_with_short_password_fails() {
    let app = TestApp::new();

    let body = json!({ "username": "alice", "password": "short" });
    let response = app.post_json("/register", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Password"));
}

#[tokio::test]
async fn register_with_short_username_fails() {
    let app = TestApp::new();

    let body = json!({ "username": "a", "password": "long-enough-password" });
    let response = app.post_json("/register", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn auth_check_without_credentials_is_unauthorized() {
    let app = TestApp::new();

    let response = app.post_json("/auth/check", "{}").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing credentials");
    assert!(body.get("logout").is_none());
}

#[tokio::test]
async fn auth_check_with_rejected_refresh_forces_logout() {
    let app = TestApp::new();

    let body = json!({ "refreshToken": "not-a-real-token" });
    let response = app.post_json("/auth/check", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["logout"], true);
}
