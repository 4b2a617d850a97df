//! Access-secret utilities
//!
//! Provides:
//! - Secret hashing and verification
//! - Bearer token extraction
//! - Log-safe redaction of rejected credentials

use sha2::{Digest, Sha256};

/// Credential transports the gate accepts, in lookup order.
/// Listed verbatim on 401 responses and the capability listing.
pub const ACCEPTED_CREDENTIALS: &[&str] = &[
    "query parameter 'password'",
    "'X-API-Password' header",
    "'Authorization: Bearer <password>' header",
    "body field 'password'",
];

/// Hash a secret for comparison
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a caller-supplied credential against the configured secret.
///
/// Both sides are hashed first so the comparison runs over fixed-width
/// digests rather than the secret's own bytes.
pub fn verify_secret(candidate: &str, secret: &str) -> bool {
    hash_secret(candidate) == hash_secret(secret)
}

/// Extract the token from a bearer-style Authorization header
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Truncate a rejected credential for logging; the full value must never
/// reach the logs
pub fn redact(credential: &str) -> String {
    let prefix: String = credential.chars().take(4).collect();
    format!("{prefix}***")
}
