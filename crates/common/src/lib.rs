//! GeoGate Common Library
//!
//! Shared code for the GeoGate proxy including:
//! - Configuration management
//! - Error types and handling
//! - Access-secret utilities
//! - The mapping operation table
//! - The upstream provider client
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod ops;
pub mod upstream;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use ops::{Operation, OPERATIONS};
pub use upstream::UpstreamClient;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name shown in the capability listing and startup banner
pub const SERVICE_NAME: &str = "GeoGate Mapping API Proxy";
