//! Listing state machine.
//!
//! # Transitions
//!
//! | Current | Verdict | Price delta | Decision |
//! |---------|---------|-------------|----------|
//! | ACTIVE | AVAILABLE | < epsilon | `NO_CHANGE` |
//! | ACTIVE | AVAILABLE | >= epsilon | `PRICE_UPDATED` |
//! | ACTIVE | UNAVAILABLE | any | `PAUSED` |
//! | ACTIVE | INDETERMINATE | any | `NO_CHANGE` |
//! | PAUSED | AVAILABLE | any | `REACTIVATED` (with new price) |
//! | PAUSED | UNAVAILABLE / INDETERMINATE | any | `NO_CHANGE` |
//! | CLOSED | any | any | `SKIPPED_ERROR` |
//!
//! An indeterminate verdict never pauses a listing; a stale price is the
//! lesser failure. CLOSED is reached only outside sync.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::{ListingPatch, ListingRecord, ListingState};
use crate::domain::availability::Verdict;
use crate::domain::pricing::PriceQuote;
use crate::domain::sync::SyncDecision;

/// Reason recorded for closed listings.
pub const CLOSED_REASON: &str = "listing closed, not managed by sync";

/// The decided target for one listing in one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Decision category.
    pub decision: SyncDecision,
    /// State to commit, when it changes.
    pub target_state: Option<ListingState>,
    /// Price to commit, when it changes.
    pub target_price: Option<Decimal>,
    /// Human-readable reason.
    pub reason: String,
}

impl Transition {
    fn no_change(reason: impl Into<String>) -> Self {
        Self {
            decision: SyncDecision::NoChange,
            target_state: None,
            target_price: None,
            reason: reason.into(),
        }
    }

    /// A skipped transition that must not mutate the listing.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            decision: SyncDecision::SkippedError,
            target_state: None,
            target_price: None,
            reason: reason.into(),
        }
    }

    /// Check if the destination must be written.
    #[must_use]
    pub const fn requires_write(&self) -> bool {
        self.target_state.is_some() || self.target_price.is_some()
    }

    /// The record patch committing this transition at `now`.
    ///
    /// Returns `None` for skipped transitions, which never touch the record.
    #[must_use]
    pub fn commit_patch(&self, now: DateTime<Utc>) -> Option<ListingPatch> {
        if self.decision == SyncDecision::SkippedError {
            return None;
        }
        Some(ListingPatch {
            current_price: self.target_price,
            current_state: self.target_state,
            last_synced_at: Some(now),
            last_error: Some(None),
        })
    }
}

/// Decides per-listing transitions from verdicts and quotes.
#[derive(Debug, Clone, Copy)]
pub struct ListingStateMachine {
    epsilon: Decimal,
}

impl Default for ListingStateMachine {
    fn default() -> Self {
        Self {
            epsilon: Decimal::new(1, 2),
        }
    }
}

impl ListingStateMachine {
    /// Create a state machine with a custom price epsilon.
    #[must_use]
    pub const fn new(epsilon: Decimal) -> Self {
        Self { epsilon }
    }

    /// Get the price epsilon.
    #[must_use]
    pub const fn epsilon(&self) -> Decimal {
        self.epsilon
    }

    /// Decide the transition for a listing.
    ///
    /// `quote` must be present whenever `verdict` is `Available`.
    #[must_use]
    pub fn decide(
        &self,
        record: &ListingRecord,
        verdict: Verdict,
        quote: Option<&PriceQuote>,
    ) -> Transition {
        match (record.current_state, verdict) {
            (ListingState::Closed, _) => Transition::skipped(CLOSED_REASON),

            (ListingState::Active, Verdict::Available) => {
                let Some(quote) = quote else {
                    return Transition::skipped("available verdict without a price quote");
                };
                let new_price = quote.destination_price;
                if self.is_unchanged(record.current_price, new_price) {
                    Transition::no_change(format!("price unchanged at {new_price}"))
                } else {
                    Transition {
                        decision: SyncDecision::PriceUpdated,
                        target_state: None,
                        target_price: Some(new_price),
                        reason: format!("price {} -> {new_price}", record.current_price),
                    }
                }
            }

            (ListingState::Active, Verdict::Unavailable) => Transition {
                decision: SyncDecision::Paused,
                target_state: Some(ListingState::Paused),
                target_price: None,
                reason: "source reports item unavailable".to_string(),
            },

            (ListingState::Active, Verdict::Indeterminate) => {
                Transition::no_change("indeterminate availability, keeping listing active")
            }

            (ListingState::Paused, Verdict::Available) => {
                let Some(quote) = quote else {
                    return Transition::skipped("available verdict without a price quote");
                };
                Transition {
                    decision: SyncDecision::Reactivated,
                    target_state: Some(ListingState::Active),
                    target_price: Some(quote.destination_price),
                    reason: format!("source back in stock at {}", quote.destination_price),
                }
            }

            (ListingState::Paused, Verdict::Unavailable) => {
                Transition::no_change("still unavailable, listing stays paused")
            }

            (ListingState::Paused, Verdict::Indeterminate) => {
                Transition::no_change("indeterminate availability, listing stays paused")
            }
        }
    }

    fn is_unchanged(&self, current: Decimal, new: Decimal) -> bool {
        (new - current).abs() < self.epsilon
    }
}
