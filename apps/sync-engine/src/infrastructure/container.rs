//! Dependency Injection Container
//!
//! Builds every adapter from [`Config`] and wires them into the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{MarketplaceError, NotifyError, ProbeError, RepositoryError};
use crate::application::services::RequestRateLimiter;
use crate::application::use_cases::{SyncOrchestrator, SyncSettings};
use crate::config::Config;
use crate::infrastructure::credentials::{
    ConfiguredCredentials, FileCredentialProvider, StaticCredentialProvider,
};
use crate::infrastructure::marketplace::{MercadoLibreAdapter, MercadoLibreConfig};
use crate::infrastructure::notification::{ConfiguredNotifier, TracingNotifier, WebhookNotifier};
use crate::infrastructure::persistence::{
    ConfiguredRepository, InMemoryListingRepository, SqliteListingRepository,
};
use crate::infrastructure::source::{AmazonProbeConfig, AmazonSourceProbe};

/// Orchestrator over the production adapters.
pub type EngineOrchestrator = SyncOrchestrator<
    AmazonSourceProbe,
    MercadoLibreAdapter,
    ConfiguredRepository,
    ConfiguredCredentials,
    ConfiguredNotifier,
>;

/// Failure building an adapter.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    /// Source probe could not be built.
    #[error("source probe: {0}")]
    Probe(#[from] ProbeError),
    /// Destination client could not be built.
    #[error("destination client: {0}")]
    Marketplace(#[from] MarketplaceError),
    /// Listing store could not be opened.
    #[error("listing store: {0}")]
    Repository(#[from] RepositoryError),
    /// Notifier could not be built.
    #[error("notifier: {0}")]
    Notifier(#[from] NotifyError),
}

/// Dependency injection container.
///
/// Holds the wired adapters; every orchestrator built from it shares them.
pub struct Container {
    probe: Arc<AmazonSourceProbe>,
    source_gate: Arc<RequestRateLimiter>,
    marketplace: Arc<MercadoLibreAdapter>,
    repository: Arc<ConfiguredRepository>,
    credentials: Arc<ConfiguredCredentials>,
    notifier: Arc<ConfiguredNotifier>,
    settings: SyncSettings,
    dry_run: bool,
}

impl Container {
    /// Build every adapter from configuration.
    pub fn from_config(config: &Config) -> Result<Self, WiringError> {
        let source = &config.source;
        let settings = config.sync_settings();
        let source_gate = Arc::new(RequestRateLimiter::new(settings.global_min_interval));
        let probe = AmazonSourceProbe::new(
            AmazonProbeConfig::new(&source.base_url)
                .with_timeout(Duration::from_secs(source.request_timeout_seconds))
                .with_user_agents(source.user_agents.clone())
                .with_currency(&source.currency),
        )?
        .with_rate_limiter(Arc::clone(&source_gate));

        let marketplace = MercadoLibreAdapter::new(
            MercadoLibreConfig::new(&config.marketplace.base_url).with_timeout(
                Duration::from_secs(config.marketplace.request_timeout_seconds),
            ),
        )?;

        let repository = if config.persistence.in_memory {
            ConfiguredRepository::InMemory(InMemoryListingRepository::new())
        } else {
            ConfiguredRepository::Sqlite(SqliteListingRepository::open(
                &config.persistence.database_path,
            )?)
        };

        let credentials = match (
            config.credentials.token_file.as_deref(),
            config.credentials.access_token.as_deref(),
        ) {
            (Some(path), _) if !path.trim().is_empty() => {
                ConfiguredCredentials::File(FileCredentialProvider::new(path))
            }
            (_, token) => {
                ConfiguredCredentials::Static(StaticCredentialProvider::new(token.unwrap_or("")))
            }
        };

        let notifier = match config.notification.webhook_url.as_deref() {
            Some(url) if !url.trim().is_empty() => ConfiguredNotifier::Webhook(WebhookNotifier::new(
                url,
                Duration::from_secs(config.notification.timeout_seconds),
            )?),
            _ => ConfiguredNotifier::Tracing(TracingNotifier),
        };

        Ok(Self {
            probe: Arc::new(probe),
            source_gate,
            marketplace: Arc::new(marketplace),
            repository: Arc::new(repository),
            credentials: Arc::new(credentials),
            notifier: Arc::new(notifier),
            settings,
            dry_run: config.sync.dry_run,
        })
    }

    /// Get the listing store.
    pub fn repository(&self) -> Arc<ConfiguredRepository> {
        Arc::clone(&self.repository)
    }

    /// Get the orchestrator settings.
    pub const fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Create a `SyncOrchestrator` over the wired adapters.
    pub fn orchestrator(&self) -> EngineOrchestrator {
        SyncOrchestrator::new(
            Arc::clone(&self.probe),
            Arc::clone(&self.marketplace),
            Arc::clone(&self.repository),
            Arc::clone(&self.credentials),
            Arc::clone(&self.notifier),
            self.settings.clone(),
        )
        .with_rotator(self.probe.rotator())
        .with_rate_limiter(Arc::clone(&self.source_gate))
        .with_dry_run(self.dry_run)
    }
}
