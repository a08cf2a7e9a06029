//! MercadoLibre adapter configuration.

use std::time::Duration;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.mercadolibre.com";

/// Configuration for the MercadoLibre adapter.
#[derive(Debug, Clone)]
pub struct MercadoLibreConfig {
    /// API base URL without trailing slash.
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for MercadoLibreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl MercadoLibreConfig {
    /// Create a configuration for an API host.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Item resource URL.
    #[must_use]
    pub fn item_url(&self, listing_id: &str) -> String {
        format!("{}/items/{listing_id}", self.base_url)
    }
}
