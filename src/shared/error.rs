//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Refresh token was rejected; the client must drop all stored
    /// credentials and re-authenticate interactively.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error response body, `{"error": message}` with an optional
/// `"logout": true` when the client must clear its credentials.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout: Option<bool>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, logout, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, None, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, None, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, None, msg.clone()),
            AppError::SessionExpired(msg) => (StatusCode::FORBIDDEN, Some(true), msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, None, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    None,
                    "Internal server error".into(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    None,
                    "Internal server error".into(),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            logout,
        };

        (status, Json(body)).into_response()
    }
}
