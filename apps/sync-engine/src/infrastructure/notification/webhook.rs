//! Summary sink that POSTs JSON to a webhook.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{NotificationPort, NotifyError};
use crate::domain::sync::CycleSummary;

/// Posts each cycle summary as JSON.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier for a webhook URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::DeliveryFailed {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl NotificationPort for WebhookNotifier {
    async fn publish_cycle_summary(&self, summary: &CycleSummary) -> Result<(), NotifyError> {
        let body = serde_json::to_value(summary).map_err(|e| NotifyError::Serialization {
            message: e.to_string(),
        })?;

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::DeliveryFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::DeliveryFailed {
                message: format!("webhook returned HTTP {}", status.as_u16()),
            });
        }
        Ok(())
    }
}
