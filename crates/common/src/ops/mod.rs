//! The mapping operation table
//!
//! Each supported provider capability is described once: its route path,
//! the provider path segment it forwards to, and the response field its
//! error envelope keeps populated (empty) so client-side parsing never has
//! to special-case a missing field. The table is static and immutable.

use serde_json::{json, Value};

/// Response envelope shape for an operation's error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `results: []`
    Results,
    /// `predictions: []`
    Predictions,
    /// `result: {}`
    Result,
    /// `rows: []`
    Rows,
    /// `routes: []`
    Routes,
}

impl Envelope {
    /// Field name populated on failure
    pub fn field(&self) -> &'static str {
        match self {
            Envelope::Results => "results",
            Envelope::Predictions => "predictions",
            Envelope::Result => "result",
            Envelope::Rows => "rows",
            Envelope::Routes => "routes",
        }
    }

    /// Empty value for the envelope field
    pub fn empty_value(&self) -> Value {
        match self {
            Envelope::Result => json!({}),
            _ => json!([]),
        }
    }
}

/// One supported mapping capability
#[derive(Debug)]
pub struct Operation {
    /// Stable identifier, also the inbound route path without the leading slash
    pub path: &'static str,

    /// Path segment on the provider
    pub upstream_path: &'static str,

    /// Error envelope shape, fixed at registration time
    pub envelope: Envelope,

    /// One-line description for the capability listing
    pub summary: &'static str,
}

impl Operation {
    /// Inbound route path
    pub fn route_path(&self) -> String {
        format!("/{}", self.path)
    }

    /// Schema-stable error body for a failed call
    pub fn error_envelope(&self, error_message: &str) -> Value {
        let mut body = json!({
            "status": "ERROR",
            "error_message": error_message,
        });
        body[self.envelope.field()] = self.envelope.empty_value();
        body
    }
}

/// Every supported mapping operation
pub const OPERATIONS: &[Operation] = &[
    Operation {
        path: "geocode/json",
        upstream_path: "/geocode/json",
        envelope: Envelope::Results,
        summary: "Forward geocoding (address to coordinates)",
    },
    Operation {
        path: "place/autocomplete/json",
        upstream_path: "/place/autocomplete/json",
        envelope: Envelope::Predictions,
        summary: "Place autocomplete suggestions",
    },
    Operation {
        path: "place/details/json",
        upstream_path: "/place/details/json",
        envelope: Envelope::Result,
        summary: "Place details lookup",
    },
    Operation {
        path: "place/nearbysearch/json",
        upstream_path: "/place/nearbysearch/json",
        envelope: Envelope::Results,
        summary: "Nearby place search",
    },
    Operation {
        path: "place/textsearch/json",
        upstream_path: "/place/textsearch/json",
        envelope: Envelope::Results,
        summary: "Free-text place search",
    },
    Operation {
        path: "distancematrix/json",
        upstream_path: "/distancematrix/json",
        envelope: Envelope::Rows,
        summary: "Travel distance and time matrix",
    },
    Operation {
        path: "directions/json",
        upstream_path: "/directions/json",
        envelope: Envelope::Routes,
        summary: "Route planning",
    },
];

/// Paths a caller may hit, listed on 404 responses
pub fn endpoint_paths() -> Vec<String> {
    OPERATIONS
        .iter()
        .map(Operation::route_path)
        .chain(["/health".to_string(), "/api-status".to_string()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_operation_has_a_distinct_path() {
        let mut paths: Vec<_> = OPERATIONS.iter().map(|op| op.path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), OPERATIONS.len());
    }

    #[test]
    fn test_error_envelope_shape() {
        let geocode = &OPERATIONS[0];
        let body = geocode.error_envelope("REQUEST_TIMEOUT");
        assert_eq!(body["status"], "ERROR");
        assert_eq!(body["error_message"], "REQUEST_TIMEOUT");
        assert_eq!(body["results"], json!([]));
    }

    #[test]
    fn test_details_envelope_is_an_object() {
        let details = OPERATIONS
            .iter()
            .find(|op| op.path == "place/details/json")
            .unwrap();
        let body = details.error_envelope("NETWORK_ERROR");
        assert_eq!(body["result"], json!({}));
    }

    #[test]
    fn test_endpoint_paths_cover_operations_and_diagnostics() {
        let paths = endpoint_paths();
        assert!(paths.contains(&"/geocode/json".to_string()));
        assert!(paths.contains(&"/directions/json".to_string()));
        assert!(paths.contains(&"/health".to_string()));
        assert!(paths.contains(&"/api-status".to_string()));
        assert_eq!(paths.len(), OPERATIONS.len() + 2);
    }
}
