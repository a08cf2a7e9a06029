//! Listing record: the durable state of one published destination item.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{DomainError, ListingId, SkuId};

/// Lifecycle state of a destination listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingState {
    /// Listed and purchasable.
    Active,
    /// Temporarily withdrawn by sync.
    Paused,
    /// Terminal; closed by an external collaborator.
    Closed,
}

impl ListingState {
    /// Get the state as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Closed => "CLOSED",
        }
    }

    /// Check if the state is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl std::fmt::Display for ListingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ListingState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "PAUSED" => Ok(Self::Paused),
            "CLOSED" => Ok(Self::Closed),
            other => Err(DomainError::invalid_value(
                "current_state",
                format!("unknown listing state '{other}'"),
            )),
        }
    }
}

/// One published destination item, keyed by `sku_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Source SKU.
    pub sku_id: SkuId,
    /// Destination listing.
    pub listing_id: ListingId,
    /// Price currently committed on the destination.
    pub current_price: Decimal,
    /// State currently committed on the destination.
    pub current_state: ListingState,
    /// Last time sync committed this record.
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Last apply failure, cleared on the next successful commit.
    pub last_error: Option<String>,
}

impl ListingRecord {
    /// Create a freshly published record.
    #[must_use]
    pub const fn new(
        sku_id: SkuId,
        listing_id: ListingId,
        current_price: Decimal,
        current_state: ListingState,
    ) -> Self {
        Self {
            sku_id,
            listing_id,
            current_price,
            current_state,
            last_synced_at: None,
            last_error: None,
        }
    }
}

/// Partial update of a [`ListingRecord`].
///
/// Fields left `None` are untouched. `last_error: Some(None)` clears the error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPatch {
    /// New committed price.
    pub current_price: Option<Decimal>,
    /// New committed state.
    pub current_state: Option<ListingState>,
    /// New sync timestamp.
    pub last_synced_at: Option<DateTime<Utc>>,
    /// New error value (`Some(None)` clears it).
    pub last_error: Option<Option<String>>,
}

impl ListingPatch {
    /// A patch that only records an apply error.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            last_error: Some(Some(message.into())),
            ..Self::default()
        }
    }

    /// Check if the patch touches nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current_price.is_none()
            && self.current_state.is_none()
            && self.last_synced_at.is_none()
            && self.last_error.is_none()
    }

    /// Check if the patch changes price or state.
    #[must_use]
    pub const fn changes_listing(&self) -> bool {
        self.current_price.is_some() || self.current_state.is_some()
    }

    /// Apply the patch to a record in place.
    pub fn apply_to(&self, record: &mut ListingRecord) {
        if let Some(price) = self.current_price {
            record.current_price = price;
        }
        if let Some(state) = self.current_state {
            record.current_state = state;
        }
        if let Some(synced_at) = self.last_synced_at {
            record.last_synced_at = Some(synced_at);
        }
        if let Some(error) = &self.last_error {
            record.last_error.clone_from(error);
        }
    }
}
