//! MercadoLibre item API request and response types.
//!
//! Prices travel as JSON numbers; they are converted to `Decimal` at the
//! boundary and rounded to cents on read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ListingUpdate, RemoteListing, RemoteListingStatus};
use crate::domain::pricing::round_price;
use crate::domain::shared::ListingId;

/// `GET /items/{id}` response (only the fields the engine reads).
#[derive(Debug, Clone, Deserialize)]
pub struct ItemResponse {
    /// Item identifier.
    pub id: String,
    /// Published price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Item status.
    pub status: RemoteListingStatus,
}

impl From<ItemResponse> for RemoteListing {
    fn from(item: ItemResponse) -> Self {
        Self {
            listing_id: ListingId::new(item.id),
            price: round_price(item.price),
            status: item.status,
        }
    }
}

/// `PUT /items/{id}` body.
#[derive(Debug, Clone, Serialize)]
pub struct ItemUpdateRequest {
    /// New price.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RemoteListingStatus>,
}

impl From<&ListingUpdate> for ItemUpdateRequest {
    fn from(update: &ListingUpdate) -> Self {
        Self {
            price: update.price,
            status: update.status,
        }
    }
}

/// Error body returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Short error code.
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorResponse {
    /// Best message available for logs.
    #[must_use]
    pub fn describe(self) -> Option<String> {
        match (self.error, self.message) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (None, Some(text)) | (Some(text), None) => Some(text),
            (None, None) => None,
        }
    }
}
