//! Source marketplace configuration.

use serde::{Deserialize, Serialize};

/// Source probe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Storefront base URL.
    pub base_url: String,
    /// Postal code for delivery-accurate pricing.
    pub postal_code: Option<String>,
    /// Skip the delivery-location step even when a postal code is set.
    pub skip_location: bool,
    /// Per-request timeout.
    pub request_timeout_seconds: u64,
    /// User-agent pool; the built-in pool is used when empty.
    pub user_agents: Vec<String>,
    /// Currency of scraped prices.
    pub currency: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.amazon.com".to_string(),
            postal_code: None,
            skip_location: false,
            request_timeout_seconds: 30,
            user_agents: Vec::new(),
            currency: "USD".to_string(),
        }
    }
}

impl SourceConfig {
    /// Postal code to apply before each probe, if any.
    #[must_use]
    pub fn effective_postal_code(&self) -> Option<&str> {
        if self.skip_location {
            return None;
        }
        self.postal_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}
