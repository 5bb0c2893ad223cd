//! Health check handler.

use axum::{response::IntoResponse, Json};

/// Liveness probe. The process is up; nothing else is checked.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
