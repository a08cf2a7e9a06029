//! Amazon probe configuration.

use std::time::Duration;

/// Built-in desktop user-agent pool.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:129.0) Gecko/20100101 Firefox/129.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36 Edg/128.0.0.0",
];

/// Amazon probe configuration.
#[derive(Debug, Clone)]
pub struct AmazonProbeConfig {
    /// Storefront base URL, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-agent pool; the built-in pool is used when empty.
    pub user_agents: Vec<String>,
    /// Currency of displayed prices.
    pub currency: String,
    /// `Accept-Language` header.
    pub accept_language: String,
}

impl Default for AmazonProbeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.amazon.com".to_string(),
            timeout: Duration::from_secs(30),
            user_agents: Vec::new(),
            currency: "USD".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

impl AmazonProbeConfig {
    /// Create a config for a storefront URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user-agent pool.
    #[must_use]
    pub fn with_user_agents(mut self, user_agents: Vec<String>) -> Self {
        self.user_agents = user_agents;
        self
    }

    /// Set the price currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Effective user-agent pool.
    #[must_use]
    pub fn user_agent_pool(&self) -> Vec<String> {
        if self.user_agents.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|ua| (*ua).to_string()).collect()
        } else {
            self.user_agents.clone()
        }
    }

    /// Product page URL for a lookup key.
    #[must_use]
    pub fn product_url(&self, lookup_key: &str) -> String {
        format!("{}/dp/{lookup_key}", self.base_url)
    }

    /// Delivery-location endpoint.
    #[must_use]
    pub fn location_url(&self) -> String {
        format!(
            "{}/portal-migration/hz/glow/address-change?actionSource=glow",
            self.base_url
        )
    }
}
