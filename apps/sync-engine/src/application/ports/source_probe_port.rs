//! Source Probe Port (Driven Port)
//!
//! Interface for resolving price, availability, and delivery estimate of one
//! source SKU. Page parsing stays behind this port; callers only ever see a
//! [`SourceSnapshot`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::availability::SourceSnapshot;
use crate::domain::shared::SkuId;

/// Delivery locale applied before reading a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleHint {
    /// Postal code used for delivery-accurate pricing.
    pub postal_code: String,
}

impl LocaleHint {
    /// Create a locale hint for a postal code.
    #[must_use]
    pub fn postal(postal_code: impl Into<String>) -> Self {
        Self {
            postal_code: postal_code.into(),
        }
    }
}

/// Transport-level probe failure.
///
/// "Item not found" and "blocked" are not errors; they are encoded in the
/// returned snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// Request timed out.
    #[error("Source request timed out: {message}")]
    Timeout {
        /// Error details.
        message: String,
    },

    /// Connection failed (DNS, reset, TLS).
    #[error("Source connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Non-2xx status unrelated to page content.
    #[error("Source returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The delivery-location side request failed.
    #[error("Failed to set delivery location: {message}")]
    LocationSetFailed {
        /// Error details.
        message: String,
    },

    /// Probe is misconfigured.
    #[error("Source probe configuration error: {message}")]
    Configuration {
        /// Error details.
        message: String,
    },
}

impl ProbeError {
    /// Check if the failure is transient and worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } | Self::LocationSetFailed { .. } => {
                true
            }
            Self::HttpStatus { status } => *status == 408 || *status == 429 || *status >= 500,
            Self::Configuration { .. } => false,
        }
    }
}

/// Port for probing the source marketplace.
///
/// Implementations must be safe to call concurrently for different SKUs.
#[async_trait]
pub trait SourceProbePort: Send + Sync {
    /// Probe one SKU.
    async fn probe(
        &self,
        sku_id: &SkuId,
        locale: Option<&LocaleHint>,
    ) -> Result<SourceSnapshot, ProbeError>;
}

/// Network identity that can be rotated (user-agent, session, connection pool).
pub trait IdentityRotator: Send + Sync {
    /// Replace the current identity with a fresh one.
    fn rotate_identity(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ProbeError::Timeout { message: "t".into() } => true; "timeout")]
    #[test_case(ProbeError::Connection { message: "reset".into() } => true; "connection")]
    #[test_case(ProbeError::HttpStatus { status: 500 } => true; "server error")]
    #[test_case(ProbeError::HttpStatus { status: 429 } => true; "throttled")]
    #[test_case(ProbeError::HttpStatus { status: 400 } => false; "bad request")]
    #[test_case(ProbeError::LocationSetFailed { message: "x".into() } => true; "location")]
    #[test_case(ProbeError::Configuration { message: "x".into() } => false; "configuration")]
    fn retryable(error: ProbeError) -> bool {
        error.is_retryable()
    }

    #[test]
    fn locale_hint_postal() {
        assert_eq!(LocaleHint::postal("33172").postal_code, "33172");
    }
}
