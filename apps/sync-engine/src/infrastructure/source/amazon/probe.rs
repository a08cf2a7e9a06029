//! Amazon product-page probe.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{StatusCode, header};
use serde_json::json;

use super::config::AmazonProbeConfig;
use super::identity::{Identity, IdentityPool};
use super::parser::{is_block_page, parse_product_page};
use crate::application::ports::{IdentityRotator, LocaleHint, ProbeError, SourceProbePort};
use crate::application::services::RequestRateLimiter;
use crate::domain::availability::{AvailabilitySignal, SourceSnapshot};
use crate::domain::shared::SkuId;

/// Probe reading price, availability, and delivery from Amazon product pages.
///
/// The delivery location is set once per session. Page reads are gated by the
/// caller's scheduler; location writes go through the limiter given here.
#[derive(Debug, Clone)]
pub struct AmazonSourceProbe {
    config: AmazonProbeConfig,
    identities: Arc<IdentityPool>,
    rate_limiter: Option<Arc<RequestRateLimiter>>,
}

impl AmazonSourceProbe {
    /// Create a probe with a fresh identity pool.
    pub fn new(config: AmazonProbeConfig) -> Result<Self, ProbeError> {
        let identities = IdentityPool::new(&config)?;
        Ok(Self {
            config,
            identities,
            rate_limiter: None,
        })
    }

    /// Share the source request gate with the scheduler.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<RequestRateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Identity pool, to be rotated by the retry scheduler.
    #[must_use]
    pub fn rotator(&self) -> Arc<dyn IdentityRotator> {
        Arc::clone(&self.identities) as Arc<dyn IdentityRotator>
    }

    /// Get the identity pool.
    #[must_use]
    pub const fn identities(&self) -> &Arc<IdentityPool> {
        &self.identities
    }

    /// Set the delivery location for this identity's session unless it is already set.
    async fn ensure_location(
        &self,
        identity: &Identity,
        user_agent: &str,
        locale: &LocaleHint,
    ) -> Result<(), ProbeError> {
        if identity.is_located_at(&locale.postal_code) {
            return Ok(());
        }
        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire().await;
        }
        self.set_location(identity, user_agent, locale).await?;
        identity.mark_located(&locale.postal_code);
        tracing::debug!(generation = identity.generation, "Delivery location set");
        Ok(())
    }

    async fn set_location(
        &self,
        identity: &Identity,
        user_agent: &str,
        locale: &LocaleHint,
    ) -> Result<(), ProbeError> {
        let body = json!({
            "locationType": "LOCATION_INPUT",
            "zipCode": locale.postal_code,
            "storeContext": "generic",
            "deviceType": "web",
            "pageType": "Gateway",
            "actionSource": "glow",
        });

        let response = identity
            .client
            .post(self.config.location_url())
            .header(header::USER_AGENT, user_agent)
            .header(header::ACCEPT_LANGUAGE, &self.config.accept_language)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProbeError::LocationSetFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::LocationSetFailed {
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let reply: serde_json::Value = response.json().await.unwrap_or_default();
        if reply.get("isValidAddress").and_then(serde_json::Value::as_i64) == Some(0) {
            return Err(ProbeError::LocationSetFailed {
                message: format!("postal code {} rejected", locale.postal_code),
            });
        }

        Ok(())
    }

    fn snapshot(&self, sku_id: &SkuId) -> SourceSnapshot {
        SourceSnapshot::new(sku_id.clone(), self.config.currency.clone())
    }
}

#[async_trait]
impl SourceProbePort for AmazonSourceProbe {
    #[tracing::instrument(skip(self, locale), fields(sku_id = %sku_id))]
    async fn probe(
        &self,
        sku_id: &SkuId,
        locale: Option<&LocaleHint>,
    ) -> Result<SourceSnapshot, ProbeError> {
        let identity = self.identities.current();
        let user_agent = self.identities.next_user_agent();

        if let Some(locale) = locale {
            self.ensure_location(&identity, &user_agent, locale).await?;
        }

        let url = self.config.product_url(sku_id.lookup_key());
        let response = identity
            .client
            .get(&url)
            .header(header::USER_AGENT, &user_agent)
            .header(header::ACCEPT_LANGUAGE, &self.config.accept_language)
            .header(header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            tracing::debug!(status = status.as_u16(), "Product page not found");
            return Ok(self
                .snapshot(sku_id)
                .with_signal(AvailabilitySignal::Unavailable));
        }

        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            if is_block_page(&body) {
                tracing::debug!(status = status.as_u16(), "Blocked by anti-bot page");
                return Ok(SourceSnapshot::blocked(
                    sku_id.clone(),
                    self.config.currency.clone(),
                ));
            }
            return Err(ProbeError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let fetched_at = Utc::now();
        let signals = parse_product_page(&body, fetched_at.date_naive());
        if signals.blocked {
            return Ok(SourceSnapshot::blocked(
                sku_id.clone(),
                self.config.currency.clone(),
            ));
        }

        let mut snapshot = SourceSnapshot {
            fetched_at,
            ..self.snapshot(sku_id).with_signal(signals.signal)
        };
        if let Some(price) = signals.price {
            snapshot = snapshot.with_price(price);
        }
        if let Some(days) = signals.delivery_days {
            snapshot = snapshot.with_delivery_days(days);
        }
        Ok(snapshot)
    }
}

fn map_transport_error(error: reqwest::Error) -> ProbeError {
    if error.is_timeout() {
        ProbeError::Timeout {
            message: error.to_string(),
        }
    } else if let Some(status) = error.status() {
        ProbeError::HttpStatus {
            status: status.as_u16(),
        }
    } else {
        ProbeError::Connection {
            message: error.to_string(),
        }
    }
}
