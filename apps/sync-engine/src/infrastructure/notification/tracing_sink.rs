//! Summary sink that writes to the log.

use async_trait::async_trait;

use crate::application::ports::{NotificationPort, NotifyError};
use crate::domain::sync::CycleSummary;

/// Logs each cycle summary; per-item details at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationPort for TracingNotifier {
    async fn publish_cycle_summary(&self, summary: &CycleSummary) -> Result<(), NotifyError> {
        tracing::info!(
            cycle_id = %summary.cycle_id,
            total = summary.total_items,
            no_change = summary.no_change,
            price_updated = summary.price_updated,
            paused = summary.paused,
            reactivated = summary.reactivated,
            errors = summary.errors,
            cancelled = summary.cancelled,
            duration_s = summary.duration_seconds(),
            "Sync cycle report"
        );
        for outcome in &summary.details {
            tracing::debug!(
                sku_id = %outcome.sku_id,
                decision = %outcome.decision,
                reason = %outcome.reason,
                "Cycle detail"
            );
        }
        Ok(())
    }
}
