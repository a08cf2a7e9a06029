//! Application Services
//!
//! Application services hold the stateful machinery shared by use cases:
//! the global request-rate gate and the retry scheduler that wraps every
//! upstream call.

mod rate_limiter;
mod retry_scheduler;

pub use rate_limiter::RequestRateLimiter;
pub use retry_scheduler::{RetryError, RetryPolicy, RetryScheduler, Retryable};
