//! Health and status handlers

use axum::Json;
use chrono::Utc;
use geogate_common::VERSION;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ApiStatusResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// Liveness probe - always returns OK if the server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Mapping API proxy is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: VERSION.to_string(),
    })
}

/// Status endpoint kept for clients that poll it separately from /health
pub async fn api_status() -> Json<ApiStatusResponse> {
    Json(ApiStatusResponse {
        status: "OK".to_string(),
        message: "Mapping API proxy is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
