//! Source snapshot: what one probe of a source SKU observed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::SkuId;

/// Raw availability signal scraped from the source page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilitySignal {
    /// Page shows a positive stock phrase or an add-to-cart control.
    InStock,
    /// Page says the item is out of stock.
    OutOfStock,
    /// Page says the item is unavailable, or the item no longer exists.
    Unavailable,
    /// Page is an anti-bot interstitial.
    Blocked,
    /// No recognizable availability phrase.
    Unknown,
}

impl AvailabilitySignal {
    /// Get the signal as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "IN_STOCK",
            Self::OutOfStock => "OUT_OF_STOCK",
            Self::Unavailable => "UNAVAILABLE",
            Self::Blocked => "BLOCKED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for AvailabilitySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of probing one source SKU at one point in time.
///
/// Created fresh per sync attempt and never persisted; only the
/// decisions derived from it are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    /// Probed SKU.
    pub sku_id: SkuId,
    /// When the page was fetched.
    pub fetched_at: DateTime<Utc>,
    /// Parsed price, if one was found.
    pub raw_price: Option<Decimal>,
    /// Currency of `raw_price`.
    pub currency: String,
    /// Scraped availability signal.
    pub availability_signal: AvailabilitySignal,
    /// Days until the earliest advertised delivery date.
    pub delivery_estimate_days: Option<u32>,
    /// Fetch attempts it took to obtain this snapshot.
    pub fetch_attempts: u32,
    /// Whether the response looked like an anti-bot page.
    pub blocked: bool,
}

impl SourceSnapshot {
    /// Create an empty snapshot (`UNKNOWN`, no price) fetched now.
    #[must_use]
    pub fn new(sku_id: SkuId, currency: impl Into<String>) -> Self {
        Self {
            sku_id,
            fetched_at: Utc::now(),
            raw_price: None,
            currency: currency.into(),
            availability_signal: AvailabilitySignal::Unknown,
            delivery_estimate_days: None,
            fetch_attempts: 1,
            blocked: false,
        }
    }

    /// Create a snapshot for an anti-bot response.
    #[must_use]
    pub fn blocked(sku_id: SkuId, currency: impl Into<String>) -> Self {
        Self {
            availability_signal: AvailabilitySignal::Blocked,
            blocked: true,
            ..Self::new(sku_id, currency)
        }
    }

    /// Set the scraped price.
    #[must_use]
    pub const fn with_price(mut self, price: Decimal) -> Self {
        self.raw_price = Some(price);
        self
    }

    /// Set the availability signal.
    #[must_use]
    pub const fn with_signal(mut self, signal: AvailabilitySignal) -> Self {
        self.availability_signal = signal;
        self
    }

    /// Set the delivery estimate.
    #[must_use]
    pub const fn with_delivery_days(mut self, days: u32) -> Self {
        self.delivery_estimate_days = Some(days);
        self
    }

    /// Set the number of fetch attempts.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.fetch_attempts = attempts;
        self
    }
}
