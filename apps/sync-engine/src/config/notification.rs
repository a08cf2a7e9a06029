//! Cycle summary notification configuration.

use serde::{Deserialize, Serialize};

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Webhook receiving the JSON summary; log only when absent.
    pub webhook_url: Option<String>,
    /// Webhook request timeout.
    pub timeout_seconds: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_seconds: 10,
        }
    }
}
