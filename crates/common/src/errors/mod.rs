//! Error types for GeoGate
//!
//! Provides:
//! - The gate / dispatch / upstream failure taxonomy
//! - HTTP status code mapping
//! - The wire-stable JSON error body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Access gate failures
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    // Routing failures
    #[error("Path {path} does not exist")]
    NotFound { path: String },

    // Upstream client failures. The Display strings are the wire-level
    // error_message values deployed clients match on.
    #[error("REQUEST_TIMEOUT")]
    UpstreamTimeout,

    #[error("HTTP_ERROR_{status}")]
    UpstreamHttp { status: u16 },

    #[error("NETWORK_ERROR")]
    UpstreamNetwork,

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,

            // 500 Internal Server Error. Upstream failures surface as 500
            // at the proxy boundary; the taxonomy survives in
            // error_message only.
            AppError::UpstreamTimeout
            | AppError::UpstreamHttp { .. }
            | AppError::UpstreamNetwork
            | AppError::Internal { .. }
            | AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire-level status marker carried in every error body
    pub fn status_label(&self) -> &'static str {
        match self {
            AppError::Unauthorized { .. } => "UNAUTHORIZED",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::NotFound { .. } => "NOT_FOUND",
            _ => "ERROR",
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error_message: String,

    /// Accepted credential transports, listed on 401 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_credentials: Option<Vec<String>>,

    /// Valid paths, listed on 404 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            status: self.status_label().to_string(),
            error_message: message,
            accepted_credentials: matches!(self, AppError::Unauthorized { .. }).then(|| {
                crate::auth::ACCEPTED_CREDENTIALS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            }),
            available_endpoints: matches!(self, AppError::NotFound { .. })
                .then(crate::ops::endpoint_paths),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        let err = AppError::Unauthorized { message: "no credential".into() };
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.status_label(), "UNAUTHORIZED");

        let err = AppError::Forbidden { message: "wrong credential".into() };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.status_label(), "FORBIDDEN");

        let err = AppError::NotFound { path: "/nope".into() };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.status_label(), "NOT_FOUND");
    }

    #[test]
    fn test_upstream_failures_surface_as_500() {
        for err in [
            AppError::UpstreamTimeout,
            AppError::UpstreamHttp { status: 502 },
            AppError::UpstreamNetwork,
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.status_label(), "ERROR");
            assert!(err.is_server_error());
        }
    }

    #[test]
    fn test_wire_error_messages() {
        assert_eq!(AppError::UpstreamTimeout.to_string(), "REQUEST_TIMEOUT");
        assert_eq!(
            AppError::UpstreamHttp { status: 502 }.to_string(),
            "HTTP_ERROR_502"
        );
        assert_eq!(AppError::UpstreamNetwork.to_string(), "NETWORK_ERROR");
    }
}
