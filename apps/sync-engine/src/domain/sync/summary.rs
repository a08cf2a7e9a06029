//! Cycle summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::{SyncDecision, SyncOutcome};
use crate::domain::shared::CycleId;

/// Reason recorded for items never started because the cycle was cancelled.
pub const CANCELLED_REASON: &str = "cycle cancelled before item was processed";

/// Aggregated result of one sync cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    /// Cycle identifier.
    pub cycle_id: CycleId,
    /// Cycle start.
    pub started_at: DateTime<Utc>,
    /// Cycle end.
    pub finished_at: DateTime<Utc>,
    /// Items processed, including skipped ones.
    pub total_items: usize,
    /// `NO_CHANGE` count.
    pub no_change: usize,
    /// `PRICE_UPDATED` count.
    pub price_updated: usize,
    /// `PAUSED` count.
    pub paused: usize,
    /// `REACTIVATED` count.
    pub reactivated: usize,
    /// `SKIPPED_ERROR` count, including cancelled items.
    pub errors: usize,
    /// Items skipped because of cancellation.
    pub cancelled: usize,
    /// Every outcome other than `NO_CHANGE`.
    pub details: Vec<SyncOutcome>,
}

impl CycleSummary {
    /// Aggregate outcomes of a finished cycle.
    #[must_use]
    pub fn from_outcomes(
        cycle_id: CycleId,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        outcomes: &[SyncOutcome],
    ) -> Self {
        let mut summary = Self {
            cycle_id,
            started_at,
            finished_at,
            total_items: outcomes.len(),
            no_change: 0,
            price_updated: 0,
            paused: 0,
            reactivated: 0,
            errors: 0,
            cancelled: 0,
            details: Vec::new(),
        };

        for outcome in outcomes {
            match outcome.decision {
                SyncDecision::NoChange => {
                    summary.no_change += 1;
                    continue;
                }
                SyncDecision::PriceUpdated => summary.price_updated += 1,
                SyncDecision::Paused => summary.paused += 1,
                SyncDecision::Reactivated => summary.reactivated += 1,
                SyncDecision::SkippedError => {
                    summary.errors += 1;
                    if outcome.reason == CANCELLED_REASON {
                        summary.cancelled += 1;
                    }
                }
            }
            summary.details.push(outcome.clone());
        }

        summary
    }

    /// Count of outcomes for a decision.
    #[must_use]
    pub const fn count(&self, decision: SyncDecision) -> usize {
        match decision {
            SyncDecision::NoChange => self.no_change,
            SyncDecision::PriceUpdated => self.price_updated,
            SyncDecision::Paused => self.paused,
            SyncDecision::Reactivated => self.reactivated,
            SyncDecision::SkippedError => self.errors,
        }
    }

    /// Check if the cycle changed any listing.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.price_updated + self.paused + self.reactivated > 0
    }

    /// Cycle duration in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
