//! The route dispatcher
//!
//! Every operation route lands here: read-style calls forward the query
//! string unchanged, write-style calls merge query and body parameters
//! (body wins on collision) and strip the access credential before
//! forwarding. Failures are rewritten into the operation's schema-stable
//! envelope.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension, Json,
};
use geogate_common::{errors::AppError, metrics::RequestMetrics, ops::Operation};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::AppState;

/// Read-style call: parameters come from the query string only
pub async fn forward_get(
    State(state): State<AppState>,
    Extension(operation): Extension<&'static Operation>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    dispatch(&state, operation, "GET", params).await
}

/// Write-style call: query and body parameters merged (body wins), the
/// access credential stripped before forwarding
pub async fn forward_post(
    State(state): State<AppState>,
    Extension(operation): Extension<&'static Operation>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut params = query;
    match body_params(&headers, &body) {
        Ok(from_body) => params.extend(from_body),
        Err(err) => return envelope_failure(operation, "POST", &err),
    }

    // The credential must never reach the provider
    let auth = &state.config.auth;
    params.remove(&auth.query_param);
    params.remove(&auth.body_field);

    dispatch(&state, operation, "POST", params).await
}

async fn dispatch(
    state: &AppState,
    operation: &Operation,
    method: &str,
    params: BTreeMap<String, String>,
) -> Response {
    let request_metrics = RequestMetrics::start(method, operation.path);

    match state.upstream.get(operation.upstream_path, &params).await {
        Ok(payload) => {
            tracing::info!(
                operation = operation.path,
                method,
                provider_status = payload
                    .get("status")
                    .and_then(|v| v.as_str())
                    .unwrap_or("-"),
                "Forwarded call"
            );
            request_metrics.finish(StatusCode::OK.as_u16());
            Json(payload).into_response()
        }
        Err(err) => {
            request_metrics.finish(StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            envelope_failure(operation, method, &err)
        }
    }
}

/// Schema-stable error response for a failed operation call
fn envelope_failure(operation: &Operation, method: &str, err: &AppError) -> Response {
    tracing::warn!(
        operation = operation.path,
        method,
        error = %err,
        "Operation call failed"
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(operation.error_envelope(&err.to_string())),
    )
        .into_response()
}

/// Fallback for unmapped paths
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound {
        path: uri.path().to_string(),
    }
}

/// Extract parameters from a JSON or urlencoded request body
fn body_params(headers: &HeaderMap, body: &Bytes) -> Result<BTreeMap<String, String>, AppError> {
    if body.is_empty() {
        return Ok(BTreeMap::new());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        let object: Map<String, Value> =
            serde_json::from_slice(body).map_err(|e| AppError::Internal {
                message: format!("Invalid JSON body: {}", e),
            })?;
        Ok(object
            .into_iter()
            .map(|(key, value)| (key, scalar_to_string(value)))
            .collect())
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Ok(url::form_urlencoded::parse(body.as_ref())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect())
    } else {
        // Other content types carry no forwardable parameters
        Ok(BTreeMap::new())
    }
}

/// Render a JSON scalar the way it would appear in a query string
fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
