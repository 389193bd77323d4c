//! Health check handler.

use axum::Json;

use crate::dto::response::HealthResponse;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "JWT Authentication API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
