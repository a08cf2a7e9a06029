//! Sync Orchestrator Use Case
//!
//! Runs one synchronization cycle over an item set:
//!
//! 1. Obtain a destination credential (fatal if missing).
//! 2. Collapse duplicate SKUs.
//! 3. For each SKU, with bounded concurrency behind one shared rate gate:
//!    read the record, probe the source, classify, quote, decide, apply.
//! 4. Aggregate outcomes and hand one summary to the notifier.
//!
//! Per-item failures become `SKIPPED_ERROR` outcomes; only configuration
//! failures abort the cycle.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use super::apply_decision::ApplyDecisionUseCase;
use crate::application::ports::{
    AccessToken, CredentialProvider, DestinationMarketplacePort, IdentityRotator,
    ListingRepository, LocaleHint, NotificationPort, SourceProbePort,
};
use crate::application::services::{RequestRateLimiter, RetryPolicy, RetryScheduler};
use crate::domain::availability::{AvailabilityClassifier, Verdict};
use crate::domain::listing::{ListingState, ListingStateMachine};
use crate::domain::pricing::{PriceCalculator, PricingPolicy};
use crate::domain::shared::{CycleId, DomainError, SkuId};
use crate::domain::sync::{CANCELLED_REASON, CycleSummary, SyncOutcome};
use crate::observability::{record_cycle_duration, record_sync_outcome};

/// Error aborting a whole cycle.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SyncError {
    /// Missing or invalid credential or configuration.
    #[error("Configuration fatal: {message}")]
    ConfigurationFatal {
        /// Error details.
        message: String,
    },

    /// The item set could not be loaded.
    #[error("Item set unavailable: {message}")]
    ItemSetUnavailable {
        /// Error details.
        message: String,
    },
}

/// Orchestrator settings.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Pricing policy.
    pub pricing: PricingPolicy,
    /// Retry policy for source probes.
    pub source_retry: RetryPolicy,
    /// Retry policy for destination calls.
    pub destination_retry: RetryPolicy,
    /// Minimum interval between source requests across all workers.
    pub global_min_interval: Duration,
    /// Items processed concurrently.
    pub concurrency: usize,
    /// Price tolerance for "unchanged".
    pub price_epsilon: Decimal,
    /// Delivery locale; `None` skips the location step.
    pub locale: Option<LocaleHint>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            pricing: PricingPolicy::default(),
            source_retry: RetryPolicy::default(),
            destination_retry: RetryPolicy::default(),
            global_min_interval: Duration::from_millis(500),
            concurrency: 2,
            price_epsilon: Decimal::new(1, 2),
            locale: None,
        }
    }
}

/// Per-cycle state shared by every item.
struct CycleContext<'a> {
    source: RetryScheduler,
    destination: RetryScheduler,
    token: AccessToken,
    cancel: &'a CancellationToken,
}

/// Use case running synchronization cycles.
pub struct SyncOrchestrator<P, M, R, C, N>
where
    P: SourceProbePort,
    M: DestinationMarketplacePort,
    R: ListingRepository,
    C: CredentialProvider,
    N: NotificationPort,
{
    probe: Arc<P>,
    repository: Arc<R>,
    credentials: Arc<C>,
    notifier: Arc<N>,
    apply: ApplyDecisionUseCase<M, R>,
    rotator: Option<Arc<dyn IdentityRotator>>,
    rate_limiter: Option<Arc<RequestRateLimiter>>,
    state_machine: ListingStateMachine,
    settings: SyncSettings,
}

impl<P, M, R, C, N> SyncOrchestrator<P, M, R, C, N>
where
    P: SourceProbePort,
    M: DestinationMarketplacePort,
    R: ListingRepository,
    C: CredentialProvider,
    N: NotificationPort,
{
    /// Create a new `SyncOrchestrator`.
    pub fn new(
        probe: Arc<P>,
        marketplace: Arc<M>,
        repository: Arc<R>,
        credentials: Arc<C>,
        notifier: Arc<N>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            probe,
            apply: ApplyDecisionUseCase::new(marketplace, Arc::clone(&repository)),
            repository,
            credentials,
            notifier,
            rotator: None,
            rate_limiter: None,
            state_machine: ListingStateMachine::new(settings.price_epsilon),
            settings,
        }
    }

    /// Rotate this identity from the source scheduler.
    #[must_use]
    pub fn with_rotator(mut self, rotator: Arc<dyn IdentityRotator>) -> Self {
        self.rotator = Some(rotator);
        self
    }

    /// Gate source requests with `limiter` instead of a fresh one per cycle.
    ///
    /// Lets the probe's own requests share the same interval.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<RequestRateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Compute and report decisions without writing.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.apply = self.apply.with_dry_run(dry_run);
        self
    }

    /// Get the settings.
    #[must_use]
    pub const fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run one cycle over every SKU in the listing store.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if the store cannot list SKUs or the cycle is
    /// configuration-fatal.
    pub async fn run_all(&self, cancel: &CancellationToken) -> Result<Vec<SyncOutcome>, SyncError> {
        let items = self
            .repository
            .list_skus()
            .await
            .map_err(|e| SyncError::ItemSetUnavailable {
                message: e.to_string(),
            })?;
        self.run_cycle(&items, cancel).await
    }

    /// Run one cycle over `items`.
    ///
    /// Returns exactly one outcome per distinct SKU.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ConfigurationFatal` if no valid credential is
    /// available. Nothing is attempted in that case.
    #[tracing::instrument(skip_all, fields(items = items.len()))]
    pub async fn run_cycle(
        &self,
        items: &[SkuId],
        cancel: &CancellationToken,
    ) -> Result<Vec<SyncOutcome>, SyncError> {
        let cycle_id = CycleId::generate();
        let started_at = Utc::now();

        let token = self.credentials.access_token().await.map_err(|e| {
            tracing::error!(error = %e, "No valid destination credential, aborting cycle");
            SyncError::ConfigurationFatal {
                message: e.to_string(),
            }
        })?;
        if token.is_blank() {
            tracing::error!("Destination credential is blank, aborting cycle");
            return Err(SyncError::ConfigurationFatal {
                message: "destination access token is blank".to_string(),
            });
        }

        let items = dedupe(items);
        tracing::info!(%cycle_id, items = items.len(), "Sync cycle started");

        let context = CycleContext {
            source: self.source_scheduler(),
            destination: RetryScheduler::new("destination", self.settings.destination_retry.clone()),
            token,
            cancel,
        };

        let outcomes: Vec<SyncOutcome> = stream::iter(items)
            .map(|sku_id| self.process_item(sku_id, &context))
            .buffer_unordered(self.settings.concurrency.max(1))
            .collect()
            .await;

        for outcome in &outcomes {
            record_sync_outcome(outcome.decision.as_str());
        }

        let summary = CycleSummary::from_outcomes(cycle_id, started_at, Utc::now(), &outcomes);
        record_cycle_duration(summary.duration_seconds());
        tracing::info!(
            cycle_id = %summary.cycle_id,
            total = summary.total_items,
            no_change = summary.no_change,
            price_updated = summary.price_updated,
            paused = summary.paused,
            reactivated = summary.reactivated,
            errors = summary.errors,
            cancelled = summary.cancelled,
            source_calls = context.source.total_calls(),
            "Sync cycle finished"
        );

        if let Err(error) = self.notifier.publish_cycle_summary(&summary).await {
            tracing::warn!(%error, "Failed to publish cycle summary");
        }
        if let Err(error) = self.repository.record_cycle(&summary).await {
            tracing::warn!(%error, "Failed to record cycle history");
        }

        Ok(outcomes)
    }

    fn source_scheduler(&self) -> RetryScheduler {
        let limiter = self.rate_limiter.clone().unwrap_or_else(|| {
            Arc::new(RequestRateLimiter::new(self.settings.global_min_interval))
        });
        let scheduler = RetryScheduler::new("source", self.settings.source_retry.clone())
            .with_rate_limiter(limiter);
        match &self.rotator {
            Some(rotator) => scheduler.with_rotator(Arc::clone(rotator)),
            None => scheduler,
        }
    }

    #[tracing::instrument(skip_all, fields(sku_id = %sku_id))]
    async fn process_item(&self, sku_id: SkuId, context: &CycleContext<'_>) -> SyncOutcome {
        if context.cancel.is_cancelled() {
            return SyncOutcome::skipped(sku_id, CANCELLED_REASON);
        }

        let record = match self.repository.find_by_sku(&sku_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!("No listing record");
                return SyncOutcome::skipped(sku_id, "no listing record");
            }
            Err(error) => {
                tracing::warn!(%error, "Listing store read failed");
                return SyncOutcome::skipped(sku_id, format!("listing store read failed: {error}"));
            }
        };

        if record.current_state == ListingState::Closed {
            let transition = self
                .state_machine
                .decide(&record, Verdict::Indeterminate, None);
            return self
                .apply
                .execute(&record, transition, &context.destination, &context.token, Utc::now())
                .await;
        }

        let snapshot = match context
            .source
            .probe(self.probe.as_ref(), &sku_id, self.settings.locale.as_ref())
            .await
        {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, listing_id = %record.listing_id, "Source probe failed");
                return SyncOutcome::skipped(sku_id, format!("source probe failed: {error}"))
                    .with_listing(record.listing_id)
                    .with_previous_price(record.current_price);
            }
        };

        let verdict = AvailabilityClassifier::classify(&snapshot);
        let quote = if verdict == Verdict::Available {
            match PriceCalculator::quote(&snapshot, &self.settings.pricing) {
                Ok(quote) => Some(quote),
                Err(error) => {
                    debug_assert!(
                        !matches!(error, DomainError::MissingPrice { .. }),
                        "quote requested for a snapshot without price: {error}"
                    );
                    tracing::error!(%error, "Pricing failed");
                    return SyncOutcome::skipped(sku_id, format!("pricing failed: {error}"))
                        .with_listing(record.listing_id)
                        .with_previous_price(record.current_price);
                }
            }
        } else {
            None
        };

        let transition = self.state_machine.decide(&record, verdict, quote.as_ref());
        tracing::info!(
            listing_id = %record.listing_id,
            signal = %snapshot.availability_signal,
            blocked = snapshot.blocked,
            attempts = snapshot.fetch_attempts,
            %verdict,
            decision = %transition.decision,
            "Decided transition"
        );

        self.apply
            .execute(&record, transition, &context.destination, &context.token, Utc::now())
            .await
    }
}

/// Keep the first occurrence of each SKU.
fn dedupe(items: &[SkuId]) -> Vec<SkuId> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|sku| seen.insert(sku.as_str()))
        .cloned()
        .collect()
}
