// crates/server/src/metrics.rs
//! Application metrics for Prometheus monitoring.
//!
//! This module provides:
//! - Prometheus metrics recorder initialization
//! - Request counter and latency histogram definitions
//! - A timer helper used by every report handler

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// This should be called once at application startup, before any metrics are recorded.
/// Returns `true` if initialization succeeded, `false` if already initialized.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        return false;
    }

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    if metrics::set_global_recorder(recorder).is_err() {
        tracing::warn!("Failed to set global metrics recorder (already set)");
        return false;
    }

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        tracing::warn!("Failed to store Prometheus handle (already set)");
    }

    describe_metrics();

    tracing::info!("Prometheus metrics initialized");
    true
}

fn describe_metrics() {
    describe_counter!(
        "api_requests_total",
        "Total number of API requests by endpoint and status"
    );
    describe_histogram!(
        "api_request_duration_seconds",
        "Duration of API requests in seconds"
    );
}

/// Render current metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

/// Record a completed API request.
///
/// # Arguments
/// * `endpoint` - Report name (e.g., "tiles", "pulse")
/// * `status` - HTTP status code as string (e.g., "200", "500")
/// * `duration` - Request duration from start instant
pub fn record_request(endpoint: &str, status: &str, duration: std::time::Duration) {
    counter!("api_requests_total", "endpoint" => endpoint.to_string(), "status" => status.to_string())
        .increment(1);
    histogram!("api_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(duration.as_secs_f64());
}

/// Helper for timing request handlers.
///
/// Usage:
/// ```ignore
/// let timer = RequestTimer::new("tiles");
/// let result = state.db.mission_brief_tiles(&filters).await;
/// timer.finish(&result);
/// ```
pub struct RequestTimer {
    endpoint: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            start: Instant::now(),
        }
    }

    /// Record the request as 200 or 500 depending on `result`, and log
    /// failures with the elapsed time.
    pub fn finish<T, E: std::fmt::Display>(self, result: &Result<T, E>) {
        let elapsed = self.start.elapsed();
        match result {
            Ok(_) => {
                tracing::debug!(
                    endpoint = self.endpoint,
                    duration_ms = elapsed.as_millis() as u64,
                    "Report served"
                );
                record_request(self.endpoint, "200", elapsed);
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = self.endpoint,
                    error = %e,
                    duration_ms = elapsed.as_millis() as u64,
                    "Report failed"
                );
                record_request(self.endpoint, "500", elapsed);
            }
        }
    }
}
