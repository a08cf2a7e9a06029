//! Credential Provider Port (Driven Port)
//!
//! Supplies the bearer credential for the destination API. Token refresh is
//! handled outside this engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Bearer token for the destination API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the token is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Credential error. Always configuration-fatal for a cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// No credential configured or found.
    #[error("Credential missing: {message}")]
    Missing {
        /// Error details.
        message: String,
    },

    /// Credential expired.
    #[error("Credential expired at {expired_at}")]
    Expired {
        /// Expiry instant.
        expired_at: DateTime<Utc>,
    },

    /// Credential present but unusable.
    #[error("Credential invalid: {message}")]
    Invalid {
        /// Error details.
        message: String,
    },
}

/// Port for obtaining a valid destination credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Get a currently valid access token.
    async fn access_token(&self) -> Result<AccessToken, CredentialError>;
}
