//! Destination Marketplace Port (Driven Port)
//!
//! Interface for reading and writing published destination listings.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::credential_port::AccessToken;
use crate::domain::listing::{ListingRecord, ListingState, Transition};
use crate::domain::shared::ListingId;

/// Listing status as reported by the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteListingStatus {
    /// Listed and purchasable.
    Active,
    /// Temporarily hidden.
    Paused,
    /// Permanently closed.
    Closed,
    /// Held by marketplace moderation.
    UnderReview,
    /// Any status this engine does not manage.
    #[serde(other)]
    Inactive,
}

impl RemoteListingStatus {
    /// Check if the listing was closed outside sync.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<ListingState> for RemoteListingStatus {
    fn from(state: ListingState) -> Self {
        match state {
            ListingState::Active => Self::Active,
            ListingState::Paused => Self::Paused,
            ListingState::Closed => Self::Closed,
        }
    }
}

/// Current state of a listing at the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteListing {
    /// Listing identifier.
    pub listing_id: ListingId,
    /// Published price.
    pub price: Decimal,
    /// Published status.
    pub status: RemoteListingStatus,
}

/// Partial listing update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingUpdate {
    /// New price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RemoteListingStatus>,
}

impl ListingUpdate {
    /// Build the destination write for a transition.
    ///
    /// Returns `None` when the transition writes nothing.
    #[must_use]
    pub fn from_transition(transition: &Transition) -> Option<Self> {
        if !transition.requires_write() {
            return None;
        }
        Some(Self {
            price: transition.target_price,
            status: transition.target_state.map(RemoteListingStatus::from),
        })
    }

    /// Build the write restoring `record`'s committed price and state on `remote`.
    ///
    /// Only diverging fields are included. Returns `None` when both agree.
    #[must_use]
    pub fn restoring(record: &ListingRecord, remote: &RemoteListing) -> Option<Self> {
        let status = RemoteListingStatus::from(record.current_state);
        let update = Self {
            price: (remote.price != record.current_price).then_some(record.current_price),
            status: (remote.status != status).then_some(status),
        };
        (update.price.is_some() || update.status.is_some()).then_some(update)
    }

    /// Check if the remote listing already carries every field of this update.
    #[must_use]
    pub fn is_satisfied_by(&self, remote: &RemoteListing) -> bool {
        self.price.is_none_or(|price| price == remote.price)
            && self.status.is_none_or(|status| status == remote.status)
    }
}

/// Destination API error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketplaceError {
    /// 4xx rejection; never retried.
    #[error("Destination rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error details.
        message: String,
    },

    /// Throttled by the destination.
    #[error("Destination rate limited")]
    RateLimited,

    /// 5xx from the destination.
    #[error("Destination server error ({status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error details.
        message: String,
    },

    /// Request timed out.
    #[error("Destination request timed out: {message}")]
    Timeout {
        /// Error details.
        message: String,
    },

    /// Connection failed.
    #[error("Destination connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Destination response decode error: {message}")]
    Decode {
        /// Error details.
        message: String,
    },
}

impl MarketplaceError {
    /// Check if the failure is transient and worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError { .. } | Self::Timeout { .. } | Self::Connection { .. }
        )
    }
}

/// Port for the destination marketplace API.
///
/// Both operations are idempotent for identical payloads.
#[async_trait]
pub trait DestinationMarketplacePort: Send + Sync {
    /// Read a listing.
    async fn get_listing(
        &self,
        listing_id: &ListingId,
        token: &AccessToken,
    ) -> Result<RemoteListing, MarketplaceError>;

    /// Apply a partial update to a listing.
    async fn update_listing(
        &self,
        listing_id: &ListingId,
        update: &ListingUpdate,
        token: &AccessToken,
    ) -> Result<(), MarketplaceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::SkuId;
    use crate::domain::sync::SyncDecision;
    use rust_decimal_macros::dec;

    fn transition(state: Option<ListingState>, price: Option<Decimal>) -> Transition {
        Transition {
            decision: SyncDecision::Reactivated,
            target_state: state,
            target_price: price,
            reason: String::new(),
        }
    }

    #[test]
    fn reactivation_update_carries_status_and_price() {
        let update =
            ListingUpdate::from_transition(&transition(Some(ListingState::Active), Some(dec!(35.10))))
                .unwrap();
        assert_eq!(update.price, Some(dec!(35.10)));
        assert_eq!(update.status, Some(RemoteListingStatus::Active));
    }

    #[test]
    fn no_write_transition_has_no_update() {
        assert!(ListingUpdate::from_transition(&transition(None, None)).is_none());
    }

    #[test]
    fn satisfied_ignores_absent_fields() {
        let remote = RemoteListing {
            listing_id: ListingId::new("CBT1"),
            price: dec!(20.00),
            status: RemoteListingStatus::Paused,
        };
        let pause = ListingUpdate {
            price: None,
            status: Some(RemoteListingStatus::Paused),
        };
        let reprice = ListingUpdate {
            price: Some(dec!(21.00)),
            status: None,
        };

        assert!(pause.is_satisfied_by(&remote));
        assert!(!reprice.is_satisfied_by(&remote));
    }

    #[test]
    fn restoring_sends_only_diverged_fields() {
        let record = ListingRecord::new(
            SkuId::new("B01"),
            ListingId::new("CBT1"),
            dec!(30.00),
            ListingState::Paused,
        );
        let mut remote = RemoteListing {
            listing_id: ListingId::new("CBT1"),
            price: dec!(30.00),
            status: RemoteListingStatus::Active,
        };

        let update = ListingUpdate::restoring(&record, &remote).unwrap();
        assert_eq!(update.status, Some(RemoteListingStatus::Paused));
        assert!(update.price.is_none());

        remote.status = RemoteListingStatus::Paused;
        assert!(ListingUpdate::restoring(&record, &remote).is_none());
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let update = ListingUpdate {
            price: None,
            status: Some(RemoteListingStatus::Paused),
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"status":"paused"}"#);
    }

    #[test]
    fn unknown_status_deserializes_as_inactive() {
        let status: RemoteListingStatus = serde_json::from_str("\"payment_required\"").unwrap();
        assert_eq!(status, RemoteListingStatus::Inactive);
    }

    #[test]
    fn only_transient_errors_retry() {
        assert!(MarketplaceError::RateLimited.is_retryable());
        assert!(
            !MarketplaceError::Rejected {
                status: 400,
                message: "bad".into()
            }
            .is_retryable()
        );
        assert!(
            MarketplaceError::ServerError {
                status: 503,
                message: "down".into()
            }
            .is_retryable()
        );
    }
}
