//! Retry, backoff and circuit breaker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::services::RetryPolicy;

/// Retry configuration shared by the source and destination schedulers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per call, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay_seconds: f64,
    /// Cap on the exponential part of the delay.
    pub max_delay_seconds: f64,
    /// Upper bound of the random jitter.
    pub jitter_seconds: f64,
    /// Rotate the source identity after this many calls.
    pub session_rotation_threshold: u64,
    /// Open the circuit after this many consecutive failures.
    pub consecutive_failure_threshold: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_seconds: 1.0,
            max_delay_seconds: 60.0,
            jitter_seconds: 0.5,
            session_rotation_threshold: 100,
            consecutive_failure_threshold: 5,
        }
    }
}

impl RetryConfig {
    /// Build the retry policy. Call after validation.
    #[must_use]
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_delays(
                seconds(self.base_delay_seconds),
                seconds(self.max_delay_seconds),
            )
            .with_jitter(seconds(self.jitter_seconds))
            .with_session_rotation_threshold(self.session_rotation_threshold)
            .with_consecutive_failure_threshold(self.consecutive_failure_threshold)
    }
}

/// Convert seconds already checked by validation; anything else becomes zero.
pub(crate) fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
