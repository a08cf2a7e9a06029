//! Per-item sync outcome.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{ListingId, SkuId};

/// Decision category for one item in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncDecision {
    /// Nothing to write; sync metadata only.
    NoChange,
    /// Destination price changed.
    PriceUpdated,
    /// Listing paused because the source is unavailable.
    Paused,
    /// Paused listing reactivated with a fresh price.
    Reactivated,
    /// Item skipped; listing left untouched.
    SkippedError,
}

impl SyncDecision {
    /// Every decision, in reporting order.
    pub const ALL: [Self; 5] = [
        Self::NoChange,
        Self::PriceUpdated,
        Self::Paused,
        Self::Reactivated,
        Self::SkippedError,
    ];

    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoChange => "NO_CHANGE",
            Self::PriceUpdated => "PRICE_UPDATED",
            Self::Paused => "PAUSED",
            Self::Reactivated => "REACTIVATED",
            Self::SkippedError => "SKIPPED_ERROR",
        }
    }
}

impl std::fmt::Display for SyncDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Item processed.
    pub sku_id: SkuId,
    /// Destination listing, when a record exists.
    pub listing_id: Option<ListingId>,
    /// Decision taken.
    pub decision: SyncDecision,
    /// Price before the cycle.
    pub previous_price: Option<Decimal>,
    /// Price after the cycle, when it changed.
    pub new_price: Option<Decimal>,
    /// Human-readable reason.
    pub reason: String,
}

impl SyncOutcome {
    /// An outcome that left the listing untouched.
    #[must_use]
    pub fn skipped(sku_id: SkuId, reason: impl Into<String>) -> Self {
        Self {
            sku_id,
            listing_id: None,
            decision: SyncDecision::SkippedError,
            previous_price: None,
            new_price: None,
            reason: reason.into(),
        }
    }

    /// Attach the listing id.
    #[must_use]
    pub fn with_listing(mut self, listing_id: ListingId) -> Self {
        self.listing_id = Some(listing_id);
        self
    }

    /// Attach the price before the cycle.
    #[must_use]
    pub const fn with_previous_price(mut self, price: Decimal) -> Self {
        self.previous_price = Some(price);
        self
    }

    /// Check if the item was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.decision == SyncDecision::SkippedError
    }
}
