//! Global request-rate gate.
//!
//! Enforces a minimum interval between consecutive upstream requests across
//! every worker of a cycle. Each caller reserves the next free slot under a
//! lock and then sleeps until that slot outside the lock, so waiting callers
//! never serialize on the mutex.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum-interval rate limiter shared by all workers.
#[derive(Debug)]
pub struct RequestRateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
    acquired: AtomicU64,
}

impl RequestRateLimiter {
    /// Create a limiter allowing one request per `min_interval`.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
            acquired: AtomicU64::new(0),
        }
    }

    /// Create a limiter for N requests per second.
    #[must_use]
    pub fn per_second(requests_per_second: u32) -> Self {
        Self::new(Duration::from_secs(1) / requests_per_second.max(1))
    }

    /// Create a limiter that never waits.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Get the minimum interval.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Number of permits handed out.
    #[must_use]
    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::Relaxed)
    }

    /// Wait for the next request slot.
    pub async fn acquire(&self) {
        self.acquired.fetch_add(1, Ordering::Relaxed);
        if self.min_interval.is_zero() {
            return;
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.min_interval);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn first_request_is_immediate() {
        let limiter = RequestRateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();

        limiter.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.acquired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_requests_are_spaced() {
        let limiter = RequestRateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_workers_share_the_gate() {
        let limiter = Arc::new(RequestRateLimiter::new(Duration::from_millis(500)));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.acquire().await;
                    Instant::now()
                })
            })
            .collect();

        let mut finished = Vec::new();
        for handle in handles {
            finished.push(handle.await.unwrap());
        }
        finished.sort();

        for pair in finished.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(500));
        }
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_time_is_not_banked() {
        let limiter = RequestRateLimiter::new(Duration::from_millis(500));
        limiter.acquire().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn unlimited_never_waits() {
        let limiter = RequestRateLimiter::unlimited();
        for _ in 0..100 {
            limiter.acquire().await;
        }
        assert_eq!(limiter.acquired(), 100);
    }

    #[test]
    fn per_second_interval() {
        assert_eq!(
            RequestRateLimiter::per_second(2).min_interval(),
            Duration::from_millis(500)
        );
        assert_eq!(
            RequestRateLimiter::per_second(0).min_interval(),
            Duration::from_secs(1)
        );
    }
}
