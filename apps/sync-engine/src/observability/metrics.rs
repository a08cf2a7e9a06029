//! Prometheus metrics for the sync engine.
//!
//! Recording functions are no-ops until [`init_metrics`] installs a recorder,
//! so library code and tests can call them unconditionally.
//!
//! # Example
//!
//! ```ignore
//! use sync_engine::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_sync_outcome("PAUSED");
//! ```

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for cycle durations (in seconds).
    pub cycle_duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // Cycle buckets from 1s to 2h
            cycle_duration_buckets: vec![
                1.0, 5.0, 15.0, 30.0, 60.0, 300.0, 900.0, 1800.0, 3600.0, 7200.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.cycle_duration_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Sync Cycle Metrics
// ============================================================================

/// Record one per-item outcome.
///
/// # Arguments
///
/// * `decision` - Decision label (e.g., `"NO_CHANGE"`, `"PAUSED"`)
pub fn record_sync_outcome(decision: &str) {
    counter!("sync_outcomes_total", "decision" => decision.to_string()).increment(1);
}

/// Record a finished cycle.
pub fn record_cycle_duration(duration_seconds: f64) {
    histogram!("sync_cycle_duration_seconds").record(duration_seconds);
}

// ============================================================================
// Upstream Metrics
// ============================================================================

/// Record one source probe attempt.
///
/// # Arguments
///
/// * `result` - `"ok"`, `"blocked"`, `"error"`
pub fn record_source_probe(result: &str) {
    counter!("source_probes_total", "result" => result.to_string()).increment(1);
}

/// Record one destination API call.
///
/// # Arguments
///
/// * `operation` - `"get"` or `"update"`
/// * `result` - `"ok"`, `"rejected"`, `"error"`
pub fn record_destination_call(operation: &str, result: &str) {
    counter!(
        "destination_calls_total",
        "operation" => operation.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}

/// Record a network identity rotation.
///
/// # Arguments
///
/// * `trigger` - `"threshold"` or `"blocked"`
pub fn record_identity_rotation(trigger: &str) {
    counter!("identity_rotations_total", "trigger" => trigger.to_string()).increment(1);
}

// ============================================================================
// Circuit Breaker Metrics
// ============================================================================

/// Circuit breaker state values for the gauge.
pub mod circuit_breaker_state {
    /// Closed state value.
    pub const CLOSED: f64 = 0.0;
    /// Open state value.
    pub const OPEN: f64 = 1.0;
}

/// Update circuit breaker state gauge.
pub fn record_circuit_breaker_state(breaker: &str, state: f64) {
    gauge!("circuit_breaker_state", "breaker" => breaker.to_string()).set(state);
}

/// Record a circuit breaker opening.
pub fn record_circuit_breaker_opened(breaker: &str) {
    counter!("circuit_breaker_opened_total", "breaker" => breaker.to_string()).increment(1);
}

/// Record a call rejected because the circuit is open.
pub fn record_circuit_breaker_rejected(breaker: &str) {
    counter!("circuit_breaker_rejected_total", "breaker" => breaker.to_string()).increment(1);
}
