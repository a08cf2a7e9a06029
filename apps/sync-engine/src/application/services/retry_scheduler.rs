//! Retry scheduling with exponential backoff, identity rotation, and
//! circuit breaking.
//!
//! One scheduler guards one upstream. It owns every counter it needs (total
//! calls for rotation, consecutive failures for the breaker), so each cycle
//! and each test gets isolated state.
//!
//! # Failure semantics
//!
//! | Attempt result | Counts as failure | Retried |
//! |----------------|-------------------|---------|
//! | Success | no (resets breaker count) | no |
//! | Blocked snapshot | yes, also rotates identity | yes |
//! | Retryable error (timeout, 5xx, 429) | yes | yes |
//! | Non-retryable error (4xx) | no | no |
//!
//! A snapshot with `UNKNOWN` availability is a success.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;

use super::rate_limiter::RequestRateLimiter;
use crate::application::ports::{
    IdentityRotator, LocaleHint, MarketplaceError, ProbeError, SourceProbePort,
};
use crate::domain::availability::SourceSnapshot;
use crate::domain::shared::SkuId;
use crate::observability::{
    record_circuit_breaker_rejected, record_identity_rotation, record_source_probe,
};
use crate::resilience::CircuitBreaker;

/// Errors that know whether another attempt may succeed.
pub trait Retryable {
    /// Check if the failure is transient.
    fn is_retryable(&self) -> bool;
}

impl Retryable for ProbeError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for MarketplaceError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per call, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Cap on the exponential part of the delay.
    pub max_delay: Duration,
    /// Upper bound of the uniform random jitter added to each delay.
    pub jitter: Duration,
    /// Rotate identity after this many total calls.
    pub session_rotation_threshold: u64,
    /// Open the circuit after this many consecutive failures.
    pub consecutive_failure_threshold: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: Duration::from_millis(500),
            session_rotation_threshold: 100,
            consecutive_failure_threshold: 5,
        }
    }
}

impl RetryPolicy {
    /// Set attempts per call.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set base and max delay.
    #[must_use]
    pub const fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Set jitter bound.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Set rotation threshold.
    #[must_use]
    pub const fn with_session_rotation_threshold(mut self, threshold: u64) -> Self {
        self.session_rotation_threshold = threshold;
        self
    }

    /// Set breaker threshold.
    #[must_use]
    pub const fn with_consecutive_failure_threshold(mut self, threshold: u32) -> Self {
        self.consecutive_failure_threshold = threshold;
        self
    }

    /// Delay before retry number `attempt` (0-based), without jitter.
    #[must_use]
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Delay before retry number `attempt` (0-based), with jitter.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_backoff(attempt) + self.random_jitter()
    }

    fn random_jitter(&self) -> Duration {
        #[allow(clippy::cast_possible_truncation)]
        let max_ms = self.jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

/// Terminal failure of a scheduled call.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The breaker is open; no attempt was made.
    #[error("circuit breaker '{breaker}' is open")]
    CircuitOpen {
        /// Breaker name.
        breaker: String,
    },

    /// Every attempt failed with a retryable error.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Last error seen.
        last: E,
    },

    /// A non-retryable error ended the call.
    #[error("{0}")]
    Permanent(E),
}

impl<E> RetryError<E> {
    /// Check if the call was rejected by the breaker.
    #[must_use]
    pub const fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }
}

enum Attempt<T, E> {
    Blocked(T),
    Failed(E),
}

/// Wraps upstream calls with retry, rotation, rate limiting, and a breaker.
pub struct RetryScheduler {
    policy: RetryPolicy,
    breaker: CircuitBreaker,
    rate_limiter: Option<Arc<RequestRateLimiter>>,
    rotator: Option<Arc<dyn IdentityRotator>>,
    total_calls: AtomicU64,
    rotations: AtomicU64,
}

impl fmt::Debug for RetryScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryScheduler")
            .field("policy", &self.policy)
            .field("breaker", &self.breaker)
            .field("total_calls", &self.total_calls)
            .field("rotations", &self.rotations)
            .finish_non_exhaustive()
    }
}

impl RetryScheduler {
    /// Create a scheduler guarding the upstream `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, policy: RetryPolicy) -> Self {
        let breaker = CircuitBreaker::new(name, policy.consecutive_failure_threshold);
        Self {
            policy,
            breaker,
            rate_limiter: None,
            rotator: None,
            total_calls: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
        }
    }

    /// Gate every attempt through a shared rate limiter.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<RequestRateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Rotate this identity on threshold and on blocked results.
    #[must_use]
    pub fn with_rotator(mut self, rotator: Arc<dyn IdentityRotator>) -> Self {
        self.rotator = Some(rotator);
        self
    }

    /// Get the policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Get the circuit breaker.
    #[must_use]
    pub const fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Total attempts made through this scheduler.
    #[must_use]
    pub fn total_calls(&self) -> u64 {
        self.total_calls.load(Ordering::SeqCst)
    }

    /// Identity rotations performed.
    #[must_use]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::SeqCst)
    }

    /// Probe a SKU with retries.
    ///
    /// Blocked snapshots are retried; when attempts run out the last blocked
    /// snapshot is returned, since blocking is evidence of nothing.
    ///
    /// # Errors
    ///
    /// Returns `RetryError` when the breaker is open or transport errors
    /// exhaust the attempts.
    pub async fn probe<P>(
        &self,
        probe: &P,
        sku_id: &SkuId,
        locale: Option<&LocaleHint>,
    ) -> Result<SourceSnapshot, RetryError<ProbeError>>
    where
        P: SourceProbePort + ?Sized,
    {
        let (snapshot, attempts) = self
            .run(
                "probe",
                || async move {
                    let result = probe.probe(sku_id, locale).await;
                    record_source_probe(match &result {
                        Ok(snapshot) if snapshot.blocked => "blocked",
                        Ok(_) => "ok",
                        Err(_) => "error",
                    });
                    result
                },
                |snapshot: &SourceSnapshot| snapshot.blocked,
            )
            .await?;

        Ok(snapshot.with_attempts(attempts))
    }

    /// Run an arbitrary upstream call with retries.
    ///
    /// # Errors
    ///
    /// Returns `RetryError` when the breaker is open, a non-retryable error
    /// occurs, or retryable errors exhaust the attempts.
    pub async fn call<T, E, F, Fut>(&self, operation: &str, op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + fmt::Display,
    {
        self.run(operation, op, |_| false)
            .await
            .map(|(value, _)| value)
    }

    async fn run<T, E, F, Fut, B>(
        &self,
        operation: &str,
        mut op: F,
        is_blocked: B,
    ) -> Result<(T, u32), RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + fmt::Display,
        B: Fn(&T) -> bool,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last: Option<Attempt<T, E>> = None;
        let mut attempts = 0;

        while attempts < max_attempts {
            if !self.breaker.is_call_permitted() {
                if last.is_none() {
                    record_circuit_breaker_rejected(self.breaker.name());
                    return Err(RetryError::CircuitOpen {
                        breaker: self.breaker.name().to_string(),
                    });
                }
                break;
            }

            if attempts > 0 {
                let delay = self.policy.backoff_delay(attempts - 1);
                tracing::debug!(
                    upstream = %self.breaker.name(),
                    operation,
                    attempt = attempts + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }

            if let Some(limiter) = &self.rate_limiter {
                limiter.acquire().await;
            }

            attempts += 1;
            let result = op().await;
            self.count_call();

            match result {
                Ok(value) if is_blocked(&value) => {
                    self.breaker.record_failure();
                    self.rotate("blocked");
                    tracing::debug!(upstream = %self.breaker.name(), operation, attempts, "Blocked response");
                    last = Some(Attempt::Blocked(value));
                }
                Ok(value) => {
                    self.breaker.record_success();
                    return Ok((value, attempts));
                }
                Err(error) if !error.is_retryable() => {
                    tracing::debug!(upstream = %self.breaker.name(), operation, %error, "Non-retryable failure");
                    return Err(RetryError::Permanent(error));
                }
                Err(error) => {
                    self.breaker.record_failure();
                    tracing::debug!(upstream = %self.breaker.name(), operation, attempts, %error, "Retryable failure");
                    last = Some(Attempt::Failed(error));
                }
            }
        }

        match last {
            Some(Attempt::Blocked(value)) => Ok((value, attempts)),
            Some(Attempt::Failed(last)) => Err(RetryError::Exhausted { attempts, last }),
            None => Err(RetryError::CircuitOpen {
                breaker: self.breaker.name().to_string(),
            }),
        }
    }

    /// Count one attempt and rotate identity on every threshold multiple.
    fn count_call(&self) {
        let total = self.total_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let threshold = self.policy.session_rotation_threshold;
        if threshold > 0 && total % threshold == 0 {
            self.rotate("threshold");
        }
    }

    fn rotate(&self, trigger: &str) {
        let Some(rotator) = &self.rotator else {
            return;
        };
        rotator.rotate_identity();
        self.rotations.fetch_add(1, Ordering::SeqCst);
        record_identity_rotation(trigger);
        tracing::debug!(upstream = %self.breaker.name(), trigger, "Rotated network identity");
    }
}
