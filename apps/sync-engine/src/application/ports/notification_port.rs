//! Notification Port (Driven Port)
//!
//! Receives one structured summary per finished cycle.

use async_trait::async_trait;

use crate::domain::sync::CycleSummary;

/// Notification error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifyError {
    /// Delivery failed.
    #[error("Notification delivery failed: {message}")]
    DeliveryFailed {
        /// Error details.
        message: String,
    },

    /// Summary could not be serialized.
    #[error("Notification serialization error: {message}")]
    Serialization {
        /// Error details.
        message: String,
    },
}

/// Port for publishing cycle summaries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Publish the end-of-cycle summary.
    async fn publish_cycle_summary(&self, summary: &CycleSummary) -> Result<(), NotifyError>;
}

/// No-op notifier for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl NotificationPort for NoOpNotifier {
    async fn publish_cycle_summary(&self, _summary: &CycleSummary) -> Result<(), NotifyError> {
        Ok(())
    }
}
