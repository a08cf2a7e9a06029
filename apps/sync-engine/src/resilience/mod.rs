//! Resilience patterns for upstream calls.
//!
//! This module provides the consecutive-failure circuit breaker shared by the
//! source and destination retry schedulers.

mod circuit_breaker;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerState};
