//! Consecutive-failure circuit breaker.
//!
//! Stops attempts against an upstream that keeps failing, so a blocking
//! source is not hammered for the rest of a cycle.
//!
//! # State Machine
//!
//! ```text
//! CLOSED → OPEN (consecutive failures >= threshold)
//! OPEN → CLOSED (explicit reset only)
//! ```
//!
//! There is no half-open probing: a breaker lives as long as the scheduler
//! that owns it, normally one cycle.

use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::observability::{
    circuit_breaker_state, record_circuit_breaker_opened, record_circuit_breaker_state,
};

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitBreakerState {
    /// Calls flow normally.
    Closed = 0,
    /// Calls are rejected.
    Open = 1,
}

impl From<u8> for CircuitBreakerState {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Open,
            _ => Self::Closed,
        }
    }
}

impl std::fmt::Display for CircuitBreakerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "CLOSED"),
            Self::Open => write!(f, "OPEN"),
        }
    }
}

/// Circuit breaker counting consecutive failures.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    failure_count: AtomicU32,
    state: AtomicU8,
    opened_at: Mutex<Option<Instant>>,
}

impl CircuitBreaker {
    /// Default consecutive failures before opening.
    pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

    /// Create a closed breaker.
    ///
    /// A threshold of zero is treated as one.
    #[must_use]
    pub fn new(name: impl Into<String>, failure_threshold: u32) -> Self {
        Self {
            name: name.into(),
            failure_threshold: failure_threshold.max(1),
            failure_count: AtomicU32::new(0),
            state: AtomicU8::new(CircuitBreakerState::Closed as u8),
            opened_at: Mutex::new(None),
        }
    }

    /// Get the breaker name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the failure threshold.
    #[must_use]
    pub const fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    /// Get current state.
    #[must_use]
    pub fn state(&self) -> CircuitBreakerState {
        CircuitBreakerState::from(self.state.load(Ordering::SeqCst))
    }

    /// Check if a call is permitted.
    #[must_use]
    pub fn is_call_permitted(&self) -> bool {
        self.state() == CircuitBreakerState::Closed
    }

    /// Get the consecutive failure count.
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::SeqCst)
    }

    /// When the breaker opened, if it is open.
    #[must_use]
    pub fn opened_at(&self) -> Option<Instant> {
        *self.opened_at.lock()
    }

    /// Record a successful call.
    ///
    /// Resets the consecutive count while closed. An open breaker stays open.
    pub fn record_success(&self) {
        if self.is_call_permitted() {
            self.failure_count.store(0, Ordering::SeqCst);
        }
    }

    /// Record a failed call.
    pub fn record_failure(&self) {
        let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
        if count < self.failure_threshold {
            return;
        }

        let opened = self
            .state
            .compare_exchange(
                CircuitBreakerState::Closed as u8,
                CircuitBreakerState::Open as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();

        if opened {
            *self.opened_at.lock() = Some(Instant::now());
            record_circuit_breaker_opened(&self.name);
            record_circuit_breaker_state(&self.name, circuit_breaker_state::OPEN);
            tracing::warn!(
                breaker = %self.name,
                failure_count = count,
                "Circuit breaker opened after {} consecutive failures",
                count
            );
        }
    }

    /// Close the breaker and clear the failure count.
    pub fn reset(&self) {
        self.failure_count.store(0, Ordering::SeqCst);
        self.state
            .store(CircuitBreakerState::Closed as u8, Ordering::SeqCst);
        *self.opened_at.lock() = None;
        record_circuit_breaker_state(&self.name, circuit_breaker_state::CLOSED);
        tracing::info!(breaker = %self.name, "Circuit breaker reset");
    }
}
