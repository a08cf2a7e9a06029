//! Destination marketplace configuration.

use serde::{Deserialize, Serialize};

/// Destination API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// API base URL.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout_seconds: u64,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mercadolibre.com".to_string(),
            request_timeout_seconds: 30,
        }
    }
}
