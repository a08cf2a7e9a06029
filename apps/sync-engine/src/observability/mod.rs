//! Observability module for metrics.
//!
//! Prometheus counters and histograms for sync outcomes, upstream calls,
//! identity rotation, and circuit breakers. Log output is configured in
//! [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, circuit_breaker_state, init_metrics,
    record_circuit_breaker_opened, record_circuit_breaker_rejected, record_circuit_breaker_state,
    record_cycle_duration, record_destination_call, record_identity_rotation,
    record_source_probe, record_sync_outcome,
};
