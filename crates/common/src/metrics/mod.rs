//! Metrics and observability utilities
//!
//! Prometheus metrics with bucket layouts sized for a pass-through proxy
//! and standardized naming conventions.

use crate::errors::AppError;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all GeoGate metrics
pub const METRICS_PREFIX: &str = "geogate";

/// Histogram buckets for inbound request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.00,
];

/// Buckets for upstream call latency, bounded by the 10s call timeout
pub const UPSTREAM_BUCKETS: &[f64] = &[
    0.050, 0.100, 0.250, 0.500, 1.000, 2.000, 5.000, 10.00,
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of proxied HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Inbound request latency in seconds"
    );

    describe_counter!(
        format!("{}_upstream_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total upstream provider calls"
    );

    describe_histogram!(
        format!("{}_upstream_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Upstream call latency in seconds"
    );

    describe_counter!(
        format!("{}_auth_decisions_total", METRICS_PREFIX),
        Unit::Count,
        "Access gate allow/deny decisions"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record one upstream call
pub fn record_upstream(duration_secs: f64, endpoint: &str, error: Option<&AppError>) {
    let outcome = match error {
        None => "success",
        Some(AppError::UpstreamTimeout) => "timeout",
        Some(AppError::UpstreamHttp { .. }) => "http_error",
        Some(_) => "network_error",
    };

    counter!(
        format!("{}_upstream_requests_total", METRICS_PREFIX),
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        format!("{}_upstream_duration_seconds", METRICS_PREFIX),
        "endpoint" => endpoint.to_string()
    )
    .record(duration_secs);
}

/// Helper to record an access gate decision
pub fn record_auth_decision(decision: &'static str) {
    counter!(
        format!("{}_auth_decisions_total", METRICS_PREFIX),
        "decision" => decision
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_are_sorted() {
        for buckets in [LATENCY_BUCKETS, UPSTREAM_BUCKETS] {
            let mut prev = 0.0;
            for &bucket in buckets {
                assert!(bucket > prev);
                prev = bucket;
            }
        }
    }

    #[test]
    fn test_upstream_buckets_cover_the_call_timeout() {
        assert_eq!(UPSTREAM_BUCKETS.last(), Some(&10.0));
    }

    #[test]
    fn test_request_metrics() {
        let metrics = RequestMetrics::start("GET", "geocode/json");
        std::thread::sleep(std::time::Duration::from_millis(10));
        metrics.finish(200);
        // Just verify it runs without panic
    }

    #[test]
    fn test_record_helpers_run() {
        record_upstream(0.02, "geocode/json", None);
        record_upstream(10.0, "geocode/json", Some(&AppError::UpstreamTimeout));
        record_auth_decision("allowed");
    }
}
