//! Notification sinks.

mod tracing_sink;
mod webhook;

use async_trait::async_trait;

pub use tracing_sink::TracingNotifier;
pub use webhook::WebhookNotifier;

use crate::application::ports::{NotificationPort, NotifyError};
use crate::domain::sync::CycleSummary;

/// Sink selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredNotifier {
    /// Log only.
    Tracing(TracingNotifier),
    /// Log, then POST to a webhook.
    Webhook(WebhookNotifier),
}

#[async_trait]
impl NotificationPort for ConfiguredNotifier {
    async fn publish_cycle_summary(&self, summary: &CycleSummary) -> Result<(), NotifyError> {
        match self {
            Self::Tracing(sink) => sink.publish_cycle_summary(summary).await,
            Self::Webhook(sink) => {
                TracingNotifier.publish_cycle_summary(summary).await?;
                sink.publish_cycle_summary(summary).await
            }
        }
    }
}
