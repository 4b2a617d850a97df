//! The access gate
//!
//! Every operation route passes through here. The caller's credential is
//! looked up in fixed priority order: query parameter, dedicated header,
//! bearer authorization header, body field. The body is buffered (and
//! restored) only when the other transports carry nothing.

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use geogate_common::{auth, errors::AppError, metrics};
use serde_json::Value;

use crate::AppState;

/// Upper bound on buffered request bodies while searching for a credential
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared-secret check applied to all operation routes
pub async fn require_password(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_config = &state.config.auth;
    let (parts, body) = request.into_parts();

    let mut candidate = query_credential(parts.uri.query(), &auth_config.query_param)
        .or_else(|| header_credential(&parts.headers, &auth_config.header))
        .or_else(|| bearer_credential(&parts.headers));

    // The body is only consulted when nothing else carried a credential
    let body = if candidate.is_none() {
        let bytes = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| AppError::Internal {
                message: format!("Failed to read request body: {}", e),
            })?;
        candidate = body_credential(&bytes, &auth_config.body_field);
        Body::from(bytes)
    } else {
        body
    };

    let Some(candidate) = candidate else {
        metrics::record_auth_decision("missing");
        tracing::warn!(path = %parts.uri.path(), "Rejected call without credential");
        return Err(AppError::Unauthorized {
            message: "Missing API password".to_string(),
        });
    };

    if !auth::verify_secret(&candidate, &auth_config.password) {
        metrics::record_auth_decision("mismatch");
        tracing::warn!(
            path = %parts.uri.path(),
            credential = %auth::redact(&candidate),
            "Rejected call with wrong credential"
        );
        return Err(AppError::Forbidden {
            message: "Invalid API password".to_string(),
        });
    }

    metrics::record_auth_decision("allowed");
    tracing::debug!(path = %parts.uri.path(), "Credential accepted");
    Ok(next.run(Request::from_parts(parts, body)).await)
}

fn query_credential(query: Option<&str>, param: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
}

fn header_credential(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn bearer_credential(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(auth::extract_bearer)
        .map(str::to_string)
}

/// Credential from a JSON object or urlencoded form body
fn body_credential(bytes: &Bytes, field: &str) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    if let Ok(object) = serde_json::from_slice::<Value>(bytes) {
        if let Some(value) = object.get(field).and_then(Value::as_str) {
            return Some(value.to_string());
        }
    }

    url::form_urlencoded::parse(bytes.as_ref())
        .find(|(key, _)| key == field)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_query_credential() {
        assert_eq!(
            query_credential(Some("address=X&password=hunter2"), "password"),
            Some("hunter2".to_string())
        );
        assert_eq!(query_credential(Some("address=X"), "password"), None);
        assert_eq!(query_credential(None, "password"), None);
    }

    #[test]
    fn test_header_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert("X-API-Password", HeaderValue::from_static("hunter2"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok3n"),
        );

        assert_eq!(
            header_credential(&headers, "X-API-Password"),
            Some("hunter2".to_string())
        );
        assert_eq!(bearer_credential(&headers), Some("tok3n".to_string()));
        assert_eq!(header_credential(&headers, "X-Other"), None);
    }

    #[test]
    fn test_body_credential() {
        let json = Bytes::from(r#"{"origin": "A", "password": "hunter2"}"#);
        assert_eq!(body_credential(&json, "password"), Some("hunter2".to_string()));

        let form = Bytes::from("origin=A&password=hunter2");
        assert_eq!(body_credential(&form, "password"), Some("hunter2".to_string()));

        let empty = Bytes::new();
        assert_eq!(body_credential(&empty, "password"), None);

        let without = Bytes::from(r#"{"origin": "A"}"#);
        assert_eq!(body_credential(&without, "password"), None);
    }
}
