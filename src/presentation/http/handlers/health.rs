//! Health and Metrics Handlers

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::infrastructure::metrics;

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    (StatusCode::OK, metrics::gather_metrics())
}
