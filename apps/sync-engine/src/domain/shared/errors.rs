//! Domain errors for the sync engine.

use thiserror::Error;

/// Domain-level errors that can occur in business logic.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A price quote was requested for a snapshot without a price.
    ///
    /// This is a caller defect: quotes are only computed for `AVAILABLE` verdicts.
    #[error("missing source price for {sku_id}")]
    MissingPrice {
        /// SKU whose snapshot had no price.
        sku_id: String,
    },

    /// Invalid value for a field.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl DomainError {
    /// Create a missing price error.
    #[must_use]
    pub fn missing_price(sku_id: impl Into<String>) -> Self {
        Self::MissingPrice {
            sku_id: sku_id.into(),
        }
    }

    /// Create an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
