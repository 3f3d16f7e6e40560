//! Session Gate Tests over Protected Routes

use axum::{body::Body, http::Request, http::StatusCode};

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn protected_route_without_credentials_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get("/chats").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing credentials");
}

#[tokio::test]
async fn protected_route_with_invalid_access_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get_auth("/chats", "garbage-token").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid token");
    assert!(body.get("logout").is_none());
}

#[tokio::test]
async fn protected_route_with_rejected_refresh_forces_logout() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("GET")
        .uri("/chats")
        .header("Authorization", "Bearer garbage-token")
        .header("x-refresh-token", "also-garbage")
        .body(Body::empty())
        .unwrap();
    let response = app.request(request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["logout"], true);
}

#[tokio::test]
async fn refresh_path_attaches_rotated_pair_to_the_response() {
    let app = TestApp::new();
    let refresh = app.tokens.issue_refresh_token("alice").unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/chats")
        .header("Authorization", "Bearer garbage-token")
        .header("x-refresh-token", refresh)
        .body(Body::empty())
        .unwrap();
    let response = app.request(request).await;

    // The gate authenticated via the refresh token, so the rotated pair is
    // on the response even though the handler itself fails on the dead
    // database pool.
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(response.status(), StatusCode::FORBIDDEN);

    let rotated_access = response
        .headers()
        .get("x-access-token")
        .expect("rotated access token header")
        .to_str()
        .unwrap();
    let rotated_refresh = response
        .headers()
        .get("x-refresh-token")
        .expect("rotated refresh token header")
        .to_str()
        .unwrap();

    let claims = app.tokens.verify_access(rotated_access).unwrap();
    assert_eq!(claims.sub, "alice");
    assert!(app.tokens.verify_refresh(rotated_refresh).is_some());
}
