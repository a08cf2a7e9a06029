//! Cycle scheduling and concurrency configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sync loop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Minimum seconds between source requests across all workers.
    pub global_min_interval_seconds: f64,
    /// Items processed concurrently.
    pub concurrency: usize,
    /// Seconds between cycle starts in loop mode.
    pub cycle_interval_seconds: u64,
    /// Compute decisions without writing anything.
    pub dry_run: bool,
    /// Price tolerance for "unchanged".
    pub price_epsilon: Decimal,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            global_min_interval_seconds: 0.5,
            concurrency: 2,
            cycle_interval_seconds: 21_600,
            dry_run: false,
            price_epsilon: Decimal::new(1, 2),
        }
    }
}
