//! Root capability listing

use axum::{extract::State, Json};
use geogate_common::{auth::ACCEPTED_CREDENTIALS, ops::OPERATIONS, SERVICE_NAME, VERSION};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct IndexResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<String>,
    pub usage: Usage,
}

#[derive(Serialize)]
pub struct Usage {
    pub base_url: String,
    pub example: String,
    pub authentication: Vec<String>,
}

/// List the supported operations and how to authenticate against them
pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    let mut endpoints: Vec<String> = OPERATIONS
        .iter()
        .map(|op| format!("GET|POST {} - {}", op.route_path(), op.summary))
        .collect();
    endpoints.push("GET /health - Health check".to_string());
    endpoints.push("GET /api-status - API status check".to_string());

    let base_url = format!("http://localhost:{}", state.config.server.port);
    let example = format!("{}/geocode/json?address=Alexanderplatz&password=<secret>", base_url);

    Json(IndexResponse {
        name: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
        description: "Forwards mapping API calls for clients that cannot hold the provider key"
            .to_string(),
        endpoints,
        usage: Usage {
            base_url,
            example,
            authentication: ACCEPTED_CREDENTIALS.iter().map(|s| s.to_string()).collect(),
        },
    })
}
