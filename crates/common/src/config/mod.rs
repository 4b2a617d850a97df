//! Configuration management for GeoGate
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Upstream provider configuration
    pub upstream: UpstreamConfig,

    /// Access gate configuration
    pub auth: AuthConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL of the provider's REST surface
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Server-side API key injected into every outbound call
    pub api_key: String,

    /// Query parameter the provider expects the key in
    #[serde(default = "default_key_param")]
    pub key_param: String,

    /// Outbound call timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Shared access secret compared against caller credentials
    pub password: String,

    /// Query parameter checked for the credential
    #[serde(default = "default_query_param")]
    pub query_param: String,

    /// Dedicated credential header
    #[serde(default = "default_password_header")]
    pub header: String,

    /// Body field checked for the credential
    #[serde(default = "default_body_field")]
    pub body_field: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,

    /// Prometheus exporter port (0 to disable)
    #[serde(default)]
    pub metrics_port: u16,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3001 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_base_url() -> String { "https://maps.googleapis.com/maps/api".to_string() }
fn default_key_param() -> String { "key".to_string() }
fn default_upstream_timeout() -> u64 { 10 }
fn default_query_param() -> String { "password".to_string() }
fn default_password_header() -> String { "X-API-Password".to_string() }
fn default_body_field() -> String { "password".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__AUTH__PASSWORD=hunter2
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.ensure_secrets()?;
        Ok(config)
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.ensure_secrets()?;
        Ok(config)
    }

    /// Reject configurations whose secrets are missing or blank, so a
    /// misconfigured process fails at startup instead of per request
    pub fn ensure_secrets(&self) -> Result<(), ConfigError> {
        if self.upstream.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "upstream.api_key must be set".to_string(),
            ));
        }
        if self.auth.password.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.password must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

impl UpstreamConfig {
    /// Get the outbound call timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                shutdown_timeout_secs: default_shutdown_timeout(),
            },
            upstream: UpstreamConfig {
                base_url: default_base_url(),
                api_key: String::new(),
                key_param: default_key_param(),
                timeout_secs: default_upstream_timeout(),
            },
            auth: AuthConfig {
                password: String::new(),
                query_param: default_query_param(),
                header: default_password_header(),
                body_field: default_body_field(),
            },
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                json_logging: false,
                metrics_port: 0,
            },
        }
    }
}
