//! Sync Cycle Integration Tests
//!
//! Full cycles through `SyncOrchestrator` with scripted fakes for the source
//! probe and the destination marketplace, the in-memory listing store, and
//! the static credential provider:
//! - Pause, reactivation and repricing
//! - Blocked probes never pausing a listing
//! - Circuit breaker stopping a failing upstream
//! - Destination failures leaving the store untouched
//! - Split writes repaired on the following cycle
//! - Exactly one outcome per SKU, cancellation, fatal credentials

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sync_engine::application::ports::{
    AccessToken, DestinationMarketplacePort, ListingRepository, ListingUpdate, LocaleHint,
    MarketplaceError, NotificationPort, NotifyError, ProbeError, RemoteListing,
    RemoteListingStatus, RepositoryError, SourceProbePort,
};
use sync_engine::domain::sync::CANCELLED_REASON;
use sync_engine::infrastructure::credentials::StaticCredentialProvider;
use sync_engine::{
    AvailabilitySignal, CycleSummary, InMemoryListingRepository, ListingId, ListingPatch,
    ListingRecord, ListingState, PricingPolicy, RetryPolicy, SkuId, SourceSnapshot, SyncDecision, SyncError,
    SyncOrchestrator, SyncOutcome, SyncSettings,
};
use tokio_util::sync::CancellationToken;

// ============================================
// Fakes
// ============================================

/// What the source page shows for a SKU.
#[derive(Debug, Clone, Copy)]
enum Page {
    InStock(Decimal),
    OutOfStock,
    Blocked,
    ConnectionReset,
}

#[derive(Default)]
struct ScriptedProbe {
    pages: Mutex<HashMap<SkuId, Page>>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    fn with(pages: impl IntoIterator<Item = (&'static str, Page)>) -> Self {
        let probe = Self::default();
        for (sku, page) in pages {
            probe.pages.lock().insert(SkuId::new(sku), page);
        }
        probe
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceProbePort for ScriptedProbe {
    async fn probe(
        &self,
        sku_id: &SkuId,
        _locale: Option<&LocaleHint>,
    ) -> Result<SourceSnapshot, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let page = self
            .pages
            .lock()
            .get(sku_id)
            .copied()
            .unwrap_or(Page::ConnectionReset);
        let snapshot = SourceSnapshot::new(sku_id.clone(), "USD");
        match page {
            Page::InStock(price) => Ok(snapshot
                .with_signal(AvailabilitySignal::InStock)
                .with_price(price)),
            Page::OutOfStock => Ok(snapshot.with_signal(AvailabilitySignal::OutOfStock)),
            Page::Blocked => Ok(SourceSnapshot::blocked(sku_id.clone(), "USD")),
            Page::ConnectionReset => Err(ProbeError::Connection {
                message: "connection reset by peer".to_string(),
            }),
        }
    }
}

#[derive(Default)]
struct FakeMarketplace {
    listings: Mutex<HashMap<ListingId, RemoteListing>>,
    fail_updates: Mutex<Option<MarketplaceError>>,
    updates: Mutex<Vec<(ListingId, ListingUpdate)>>,
    cancel_on_update: Mutex<Option<CancellationToken>>,
}

impl FakeMarketplace {
    fn publish(&self, listing_id: &str, price: Decimal, status: RemoteListingStatus) {
        let listing_id = ListingId::new(listing_id);
        self.listings.lock().insert(
            listing_id.clone(),
            RemoteListing {
                listing_id,
                price,
                status,
            },
        );
    }

    fn remote(&self, listing_id: &str) -> RemoteListing {
        self.listings
            .lock()
            .get(&ListingId::new(listing_id))
            .cloned()
            .unwrap()
    }

    fn update_count(&self) -> usize {
        self.updates.lock().len()
    }
}

#[async_trait]
impl DestinationMarketplacePort for FakeMarketplace {
    async fn get_listing(
        &self,
        listing_id: &ListingId,
        _token: &AccessToken,
    ) -> Result<RemoteListing, MarketplaceError> {
        self.listings
            .lock()
            .get(listing_id)
            .cloned()
            .ok_or_else(|| MarketplaceError::Rejected {
                status: 404,
                message: "item not found".to_string(),
            })
    }

    async fn update_listing(
        &self,
        listing_id: &ListingId,
        update: &ListingUpdate,
        _token: &AccessToken,
    ) -> Result<(), MarketplaceError> {
        if let Some(error) = self.fail_updates.lock().clone() {
            return Err(error);
        }
        self.updates.lock().push((listing_id.clone(), update.clone()));
        if let Some(cancel) = self.cancel_on_update.lock().as_ref() {
            cancel.cancel();
        }
        if let Some(remote) = self.listings.lock().get_mut(listing_id) {
            if let Some(price) = update.price {
                remote.price = price;
            }
            if let Some(status) = update.status {
                remote.status = status;
            }
        }
        Ok(())
    }
}

/// Listing store whose listing-changing writes fail while `failing` is set.
struct FlakyStore {
    inner: InMemoryListingRepository,
    failing: AtomicBool,
}

#[async_trait]
impl ListingRepository for FlakyStore {
    async fn find_by_sku(&self, sku_id: &SkuId) -> Result<Option<ListingRecord>, RepositoryError> {
        self.inner.find_by_sku(sku_id).await
    }

    async fn update(&self, sku_id: &SkuId, patch: &ListingPatch) -> Result<(), RepositoryError> {
        if patch.changes_listing() && self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::storage("database is locked"));
        }
        self.inner.update(sku_id, patch).await
    }

    async fn insert(&self, record: ListingRecord) -> Result<(), RepositoryError> {
        self.inner.insert(record).await
    }

    async fn list_skus(&self) -> Result<Vec<SkuId>, RepositoryError> {
        self.inner.list_skus().await
    }
}

#[derive(Default)]
struct RecordingNotifier {
    summaries: Mutex<Vec<CycleSummary>>,
}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn publish_cycle_summary(&self, summary: &CycleSummary) -> Result<(), NotifyError> {
        self.summaries.lock().push(summary.clone());
        Ok(())
    }
}

// ============================================
// Harness
// ============================================

type Orchestrator = SyncOrchestrator<
    ScriptedProbe,
    FakeMarketplace,
    InMemoryListingRepository,
    StaticCredentialProvider,
    RecordingNotifier,
>;

struct Harness {
    probe: Arc<ScriptedProbe>,
    marketplace: Arc<FakeMarketplace>,
    repository: Arc<InMemoryListingRepository>,
    notifier: Arc<RecordingNotifier>,
    orchestrator: Orchestrator,
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::default()
        .with_delays(Duration::ZERO, Duration::ZERO)
        .with_jitter(Duration::ZERO)
}

fn settings() -> SyncSettings {
    SyncSettings {
        source_retry: fast_retry(),
        destination_retry: fast_retry(),
        global_min_interval: Duration::ZERO,
        ..SyncSettings::default()
    }
}

fn record(sku: &str, listing: &str, price: Decimal, state: ListingState) -> ListingRecord {
    ListingRecord::new(SkuId::new(sku), ListingId::new(listing), price, state)
}

fn harness(
    probe: ScriptedProbe,
    records: Vec<ListingRecord>,
    settings: SyncSettings,
    token: &str,
) -> Harness {
    let probe = Arc::new(probe);
    let marketplace = Arc::new(FakeMarketplace::default());
    for record in &records {
        marketplace.publish(
            record.listing_id.as_str(),
            record.current_price,
            record.current_state.into(),
        );
    }
    let repository = Arc::new(InMemoryListingRepository::with_records(records));
    let notifier = Arc::new(RecordingNotifier::default());
    let orchestrator = SyncOrchestrator::new(
        Arc::clone(&probe),
        Arc::clone(&marketplace),
        Arc::clone(&repository),
        Arc::new(StaticCredentialProvider::new(token)),
        Arc::clone(&notifier),
        settings,
    );
    Harness {
        probe,
        marketplace,
        repository,
        notifier,
        orchestrator,
    }
}

async fn stored(repository: &InMemoryListingRepository, sku: &str) -> ListingRecord {
    repository
        .find_by_sku(&SkuId::new(sku))
        .await
        .unwrap()
        .unwrap()
}

fn outcome_for<'a>(outcomes: &'a [SyncOutcome], sku: &str) -> &'a SyncOutcome {
    outcomes
        .iter()
        .find(|o| o.sku_id.as_str() == sku)
        .unwrap_or_else(|| panic!("no outcome for {sku}"))
}

fn skus(ids: &[&str]) -> Vec<SkuId> {
    ids.iter().map(|id| SkuId::new(*id)).collect()
}

// ============================================
// Transitions
// ============================================

#[tokio::test]
async fn out_of_stock_pauses_active_listing() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::OutOfStock)]),
        vec![record("B01", "CBT1", dec!(33.02), ListingState::Active)],
        settings(),
        "APP_USR-1",
    );

    let outcomes = h
        .orchestrator
        .run_cycle(&skus(&["B01"]), &CancellationToken::new())
        .await
        .unwrap();

    let outcome = outcome_for(&outcomes, "B01");
    assert_eq!(outcome.decision, SyncDecision::Paused);
    assert!(outcome.new_price.is_none());
    assert_eq!(outcome.previous_price, Some(dec!(33.02)));

    let record = stored(&h.repository, "B01").await;
    assert_eq!(record.current_state, ListingState::Paused);
    assert_eq!(record.current_price, dec!(33.02));
    assert!(record.last_synced_at.is_some());
    assert_eq!(h.marketplace.remote("CBT1").status, RemoteListingStatus::Paused);
}

#[tokio::test]
async fn back_in_stock_reactivates_paused_listing_at_new_price() {
    let pricing = PricingPolicy {
        tax_exempt: true,
        fulfillment_fee: dec!(4.00),
        markup_pct: dec!(30),
        ..PricingPolicy::default()
    };
    let h = harness(
        ScriptedProbe::with([("B01", Page::InStock(dec!(23.00)))]),
        vec![record("B01", "CBT1", dec!(30.00), ListingState::Paused)],
        SyncSettings {
            pricing,
            ..settings()
        },
        "APP_USR-1",
    );

    let outcomes = h
        .orchestrator
        .run_cycle(&skus(&["B01"]), &CancellationToken::new())
        .await
        .unwrap();

    let outcome = outcome_for(&outcomes, "B01");
    assert_eq!(outcome.decision, SyncDecision::Reactivated);
    assert_eq!(outcome.new_price, Some(dec!(35.10)));

    let record = stored(&h.repository, "B01").await;
    assert_eq!(record.current_state, ListingState::Active);
    assert_eq!(record.current_price, dec!(35.10));

    let remote = h.marketplace.remote("CBT1");
    assert_eq!(remote.status, RemoteListingStatus::Active);
    assert_eq!(remote.price, dec!(35.10));
}

#[tokio::test]
async fn in_stock_price_change_reprices_with_landed_cost_formula() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::InStock(dec!(20.00)))]),
        vec![record("B01", "CBT1", dec!(30.00), ListingState::Active)],
        settings(),
        "APP_USR-1",
    );

    let outcomes = h
        .orchestrator
        .run_cycle(&skus(&["B01"]), &CancellationToken::new())
        .await
        .unwrap();

    // (20.00 + 1.40 + 4.00) * 1.30
    let outcome = outcome_for(&outcomes, "B01");
    assert_eq!(outcome.decision, SyncDecision::PriceUpdated);
    assert_eq!(outcome.new_price, Some(dec!(33.02)));
    assert_eq!(stored(&h.repository, "B01").await.current_price, dec!(33.02));
    assert_eq!(h.marketplace.remote("CBT1").price, dec!(33.02));
}

#[tokio::test]
async fn repeated_cycles_converge_without_further_writes() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::InStock(dec!(20.00)))]),
        vec![record("B01", "CBT1", dec!(30.00), ListingState::Active)],
        settings(),
        "APP_USR-1",
    );
    let cancel = CancellationToken::new();

    h.orchestrator.run_cycle(&skus(&["B01"]), &cancel).await.unwrap();
    let second = h.orchestrator.run_cycle(&skus(&["B01"]), &cancel).await.unwrap();

    assert_eq!(outcome_for(&second, "B01").decision, SyncDecision::NoChange);
    assert_eq!(h.marketplace.update_count(), 1);
    assert_eq!(stored(&h.repository, "B01").await.current_price, dec!(33.02));
}

#[tokio::test]
async fn blocked_probe_never_pauses() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::Blocked)]),
        vec![record("B01", "CBT1", dec!(33.02), ListingState::Active)],
        settings(),
        "APP_USR-1",
    );

    let outcomes = h
        .orchestrator
        .run_cycle(&skus(&["B01"]), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome_for(&outcomes, "B01").decision, SyncDecision::NoChange);
    assert_eq!(h.probe.calls(), 3);
    assert_eq!(h.marketplace.update_count(), 0);
    assert_eq!(
        stored(&h.repository, "B01").await.current_state,
        ListingState::Active
    );
}

// ============================================
// Failure handling
// ============================================

#[tokio::test]
async fn circuit_opens_and_skips_remaining_items_without_network() {
    let ids = ["B01", "B02", "B03", "B04", "B05", "B06", "B07", "B08"];
    let records = ids
        .iter()
        .map(|id| record(id, &format!("CBT-{id}"), dec!(33.02), ListingState::Active))
        .collect();
    let h = harness(
        ScriptedProbe::default(),
        records,
        SyncSettings {
            source_retry: fast_retry().with_max_attempts(1),
            concurrency: 1,
            ..settings()
        },
        "APP_USR-1",
    );

    let outcomes = h
        .orchestrator
        .run_cycle(&skus(&ids), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcomes.len(), ids.len());
    assert!(
        outcomes
            .iter()
            .all(|o| o.decision == SyncDecision::SkippedError)
    );
    assert_eq!(h.probe.calls(), 5);
    let open = outcomes
        .iter()
        .filter(|o| o.reason.contains("circuit breaker"))
        .count();
    assert_eq!(open, 3);
    assert_eq!(h.marketplace.update_count(), 0);
}

#[tokio::test]
async fn failed_destination_write_leaves_store_untouched() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::OutOfStock)]),
        vec![record("B01", "CBT1", dec!(33.02), ListingState::Active)],
        settings(),
        "APP_USR-1",
    );
    *h.marketplace.fail_updates.lock() = Some(MarketplaceError::ServerError {
        status: 503,
        message: "unavailable".to_string(),
    });

    let outcomes = h
        .orchestrator
        .run_cycle(&skus(&["B01"]), &CancellationToken::new())
        .await
        .unwrap();

    let outcome = outcome_for(&outcomes, "B01");
    assert_eq!(outcome.decision, SyncDecision::SkippedError);
    assert!(outcome.reason.contains("destination write failed"));

    let record = stored(&h.repository, "B01").await;
    assert_eq!(record.current_state, ListingState::Active);
    assert_eq!(record.current_price, dec!(33.02));
    assert!(record.last_synced_at.is_none());
}

#[tokio::test]
async fn listing_closed_at_destination_is_skipped() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::OutOfStock)]),
        vec![record("B01", "CBT1", dec!(33.02), ListingState::Active)],
        settings(),
        "APP_USR-1",
    );
    h.marketplace
        .publish("CBT1", dec!(33.02), RemoteListingStatus::Closed);

    let outcomes = h
        .orchestrator
        .run_cycle(&skus(&["B01"]), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome_for(&outcomes, "B01").decision, SyncDecision::SkippedError);
    assert_eq!(h.marketplace.update_count(), 0);
    assert_eq!(
        stored(&h.repository, "B01").await.current_state,
        ListingState::Active
    );
}

#[tokio::test]
async fn split_write_is_repaired_on_next_cycle() {
    let probe = Arc::new(ScriptedProbe::with([("B01", Page::InStock(dec!(23.00)))]));
    let marketplace = Arc::new(FakeMarketplace::default());
    marketplace.publish("CBT1", dec!(30.00), RemoteListingStatus::Paused);
    let store = Arc::new(FlakyStore {
        inner: InMemoryListingRepository::with_records(vec![record(
            "B01",
            "CBT1",
            dec!(30.00),
            ListingState::Paused,
        )]),
        failing: AtomicBool::new(true),
    });
    let orchestrator = SyncOrchestrator::new(
        Arc::clone(&probe),
        Arc::clone(&marketplace),
        Arc::clone(&store),
        Arc::new(StaticCredentialProvider::new("APP_USR-1")),
        Arc::new(RecordingNotifier::default()),
        SyncSettings {
            pricing: PricingPolicy {
                tax_exempt: true,
                fulfillment_fee: dec!(4.00),
                markup_pct: dec!(30),
                ..PricingPolicy::default()
            },
            ..settings()
        },
    );
    let cancel = CancellationToken::new();

    // Cycle 1: the destination is reactivated but the record cannot be committed.
    let first = orchestrator.run_cycle(&skus(&["B01"]), &cancel).await.unwrap();
    assert_eq!(outcome_for(&first, "B01").decision, SyncDecision::SkippedError);
    assert_eq!(marketplace.remote("CBT1").status, RemoteListingStatus::Active);
    let record = stored(&store.inner, "B01").await;
    assert_eq!(record.current_state, ListingState::Paused);
    assert!(record.last_error.is_some());

    // Cycle 2: the item is gone again, so the decision is a no-op for the record.
    store.failing.store(false, Ordering::SeqCst);
    probe.pages.lock().insert(SkuId::new("B01"), Page::OutOfStock);
    let second = orchestrator.run_cycle(&skus(&["B01"]), &cancel).await.unwrap();

    assert_eq!(outcome_for(&second, "B01").decision, SyncDecision::NoChange);
    let remote = marketplace.remote("CBT1");
    assert_eq!(remote.status, RemoteListingStatus::Paused);
    assert_eq!(remote.price, dec!(30.00));
    assert_eq!(marketplace.update_count(), 2);
    let record = stored(&store.inner, "B01").await;
    assert_eq!(record.current_state, ListingState::Paused);
    assert!(record.last_error.is_none());
    assert!(record.last_synced_at.is_some());
}

#[tokio::test]
async fn blank_credential_is_fatal_before_any_item() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::OutOfStock)]),
        vec![record("B01", "CBT1", dec!(33.02), ListingState::Active)],
        settings(),
        "",
    );

    let result = h
        .orchestrator
        .run_cycle(&skus(&["B01"]), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(SyncError::ConfigurationFatal { .. })));
    assert_eq!(h.probe.calls(), 0);
    assert!(h.notifier.summaries.lock().is_empty());
}

// ============================================
// Cycle accounting
// ============================================

#[tokio::test]
async fn exactly_one_outcome_per_distinct_sku() {
    let h = harness(
        ScriptedProbe::with([
            ("B01", Page::OutOfStock),
            ("B02", Page::InStock(dec!(20.00))),
            ("B03", Page::Blocked),
        ]),
        vec![
            record("B01", "CBT1", dec!(33.02), ListingState::Active),
            record("B02", "CBT2", dec!(33.02), ListingState::Active),
            record("B03", "CBT3", dec!(33.02), ListingState::Paused),
        ],
        SyncSettings {
            concurrency: 4,
            ..settings()
        },
        "APP_USR-1",
    );

    let outcomes = h
        .orchestrator
        .run_cycle(
            &skus(&["B01", "B02", "B01", "B03", "B404", "B02"]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcome_for(&outcomes, "B01").decision, SyncDecision::Paused);
    assert_eq!(outcome_for(&outcomes, "B02").decision, SyncDecision::NoChange);
    assert_eq!(outcome_for(&outcomes, "B03").decision, SyncDecision::NoChange);
    let missing = outcome_for(&outcomes, "B404");
    assert_eq!(missing.decision, SyncDecision::SkippedError);
    assert_eq!(missing.reason, "no listing record");

    let summaries = h.notifier.summaries.lock();
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.total_items, 4);
    assert_eq!(summary.paused, 1);
    assert_eq!(summary.no_change, 2);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.details.len(), 2);
}

#[tokio::test]
async fn cancelled_cycle_skips_every_item_without_probing() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::OutOfStock), ("B02", Page::OutOfStock)]),
        vec![
            record("B01", "CBT1", dec!(33.02), ListingState::Active),
            record("B02", "CBT2", dec!(33.02), ListingState::Active),
        ],
        settings(),
        "APP_USR-1",
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcomes = h
        .orchestrator
        .run_cycle(&skus(&["B01", "B02"]), &cancel)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.reason == CANCELLED_REASON));
    assert_eq!(h.probe.calls(), 0);
    assert_eq!(h.notifier.summaries.lock()[0].cancelled, 2);
    assert_eq!(
        stored(&h.repository, "B01").await.current_state,
        ListingState::Active
    );
}

#[tokio::test]
async fn cancellation_mid_cycle_finishes_current_item_only() {
    let h = harness(
        ScriptedProbe::with([
            ("B01", Page::OutOfStock),
            ("B02", Page::OutOfStock),
            ("B03", Page::OutOfStock),
        ]),
        vec![
            record("B01", "CBT1", dec!(33.02), ListingState::Active),
            record("B02", "CBT2", dec!(33.02), ListingState::Active),
            record("B03", "CBT3", dec!(33.02), ListingState::Active),
        ],
        SyncSettings {
            concurrency: 1,
            ..settings()
        },
        "APP_USR-1",
    );
    let cancel = CancellationToken::new();
    *h.marketplace.cancel_on_update.lock() = Some(cancel.clone());

    let outcomes = h
        .orchestrator
        .run_cycle(&skus(&["B01", "B02", "B03"]), &cancel)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcome_for(&outcomes, "B01").decision, SyncDecision::Paused);
    assert_eq!(
        stored(&h.repository, "B01").await.current_state,
        ListingState::Paused
    );
    assert_eq!(h.marketplace.remote("CBT1").status, RemoteListingStatus::Paused);
    for sku in ["B02", "B03"] {
        assert_eq!(outcome_for(&outcomes, sku).reason, CANCELLED_REASON);
        assert_eq!(
            stored(&h.repository, sku).await.current_state,
            ListingState::Active
        );
    }
    assert_eq!(h.probe.calls(), 1);
    assert_eq!(h.marketplace.update_count(), 1);
    assert_eq!(h.notifier.summaries.lock()[0].cancelled, 2);
}

#[tokio::test]
async fn dry_run_reports_without_writing() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::OutOfStock)]),
        vec![record("B01", "CBT1", dec!(33.02), ListingState::Active)],
        settings(),
        "APP_USR-1",
    );
    let orchestrator = h.orchestrator.with_dry_run(true);

    let outcomes = orchestrator
        .run_cycle(&skus(&["B01"]), &CancellationToken::new())
        .await
        .unwrap();

    let outcome = outcome_for(&outcomes, "B01");
    assert_eq!(outcome.decision, SyncDecision::Paused);
    assert!(outcome.reason.starts_with("dry-run: "));
    assert_eq!(h.marketplace.update_count(), 0);
    let record = stored(&h.repository, "B01").await;
    assert_eq!(record.current_state, ListingState::Active);
    assert!(record.last_synced_at.is_none());
}

#[tokio::test]
async fn run_all_syncs_every_stored_sku_and_records_history() {
    let h = harness(
        ScriptedProbe::with([("B01", Page::OutOfStock), ("B02", Page::InStock(dec!(20.00)))]),
        vec![
            record("B02", "CBT2", dec!(30.00), ListingState::Active),
            record("B01", "CBT1", dec!(33.02), ListingState::Active),
        ],
        settings(),
        "APP_USR-1",
    );

    let outcomes = h.orchestrator.run_all(&CancellationToken::new()).await.unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcome_for(&outcomes, "B01").decision, SyncDecision::Paused);
    assert_eq!(outcome_for(&outcomes, "B02").decision, SyncDecision::PriceUpdated);
    let cycles = h.repository.cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].price_updated, 1);
}
