//! Sync Engine Binary
//!
//! Runs synchronization cycles until SIGINT/SIGTERM.
//!
//! # Usage
//!
//! ```bash
//! sync-engine          # loop every sync.cycle_interval_seconds
//! sync-engine --once   # single cycle, then exit
//! ```
//!
//! # Environment Variables
//!
//! - `SYNC_CONFIG`: config file path (default: `config.yaml`)
//! - `RUST_LOG`: log filter (default: `sync_engine=info`)
//! - anything referenced as `${VAR}` from the config file

use std::time::Duration;

use anyhow::Context;
use sync_engine::config::{Config, config_path, load_config};
use sync_engine::infrastructure::{Container, EngineOrchestrator};
use sync_engine::observability::{MetricsConfig, init_metrics};
use sync_engine::telemetry::init_tracing;
use sync_engine::SyncError;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let once = std::env::args().skip(1).any(|arg| arg == "--once");
    let path = config_path();
    let config = load_config(Some(&path)).with_context(|| format!("loading {path}"))?;

    init_tracing(config.observability.log_format)?;
    tracing::info!(config = %path, once, dry_run = config.sync.dry_run, "Starting sync engine");

    if let Some(listen_addr) = config.metrics_addr() {
        init_metrics(&MetricsConfig {
            listen_addr,
            ..MetricsConfig::default()
        })?;
    }

    let container = Container::from_config(&config).context("wiring adapters")?;
    let orchestrator = container.orchestrator();

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    if once {
        run_once(&orchestrator, &cancel).await?;
    } else {
        run_loop(&orchestrator, &config, &cancel).await;
    }

    tracing::info!("Sync engine stopped");
    Ok(())
}

/// Run one cycle over every stored SKU.
async fn run_once(
    orchestrator: &EngineOrchestrator,
    cancel: &CancellationToken,
) -> Result<(), SyncError> {
    let outcomes = orchestrator.run_all(cancel).await?;
    tracing::info!(outcomes = outcomes.len(), "Cycle finished");
    Ok(())
}

/// Run cycles every `cycle_interval_seconds` until cancelled.
///
/// A fatal cycle is logged and retried at the next interval; the token file
/// may have been refreshed by then.
async fn run_loop(orchestrator: &EngineOrchestrator, config: &Config, cancel: &CancellationToken) {
    let interval = Duration::from_secs(config.sync.cycle_interval_seconds);

    loop {
        if let Err(e) = run_once(orchestrator, cancel).await {
            tracing::error!(error = %e, "Cycle aborted");
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        for dir in cwd.ancestors().skip(1) {
            let env_path = dir.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
        }
    }
}

/// Cancel `token` on SIGINT or SIGTERM.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, finishing in-flight items");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, finishing in-flight items");
        }
    }

    token.cancel();
}
