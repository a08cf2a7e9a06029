//! Configuration module for the sync engine.
//!
//! YAML configuration with `${VAR}` / `${VAR:-default}` environment variable
//! interpolation and validation. Every section is optional and falls back
//! to its defaults.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sync_engine::config::{config_path, load_config};
//!
//! let config = load_config(Some(&config_path()))?;
//! let settings = config.sync_settings();
//! ```

mod credentials;
mod marketplace;
mod notification;
mod observability;
mod persistence;
mod retry;
mod source;
mod sync;

use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use credentials::CredentialsConfig;
pub use marketplace::MarketplaceConfig;
pub use notification::NotificationConfig;
pub use observability::{LogFormat, ObservabilityConfig};
pub use persistence::PersistenceConfig;
pub use retry::RetryConfig;
pub(crate) use retry::seconds;
pub use source::SourceConfig;
pub use sync::SyncConfig;

use crate::application::ports::LocaleHint;
use crate::application::use_cases::SyncSettings;
use crate::domain::pricing::PricingPolicy;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SYNC_CONFIG";

/// Config file used when `SYNC_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cost formula inputs.
    pub pricing: PricingPolicy,
    /// Retry, backoff and circuit breaker settings.
    pub retry: RetryConfig,
    /// Cycle scheduling and concurrency.
    pub sync: SyncConfig,
    /// Source marketplace.
    pub source: SourceConfig,
    /// Destination marketplace.
    pub marketplace: MarketplaceConfig,
    /// Destination credentials.
    pub credentials: CredentialsConfig,
    /// Listing store.
    pub persistence: PersistenceConfig,
    /// Cycle summary notification.
    pub notification: NotificationConfig,
    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Orchestrator settings derived from this configuration.
    #[must_use]
    pub fn sync_settings(&self) -> SyncSettings {
        let policy = self.retry.to_policy();
        SyncSettings {
            pricing: self.pricing.clone(),
            source_retry: policy.clone(),
            destination_retry: policy,
            global_min_interval: seconds(self.sync.global_min_interval_seconds),
            concurrency: self.sync.concurrency,
            price_epsilon: self.sync.price_epsilon,
            locale: self.source.effective_postal_code().map(LocaleHint::postal),
        }
    }

    /// Parsed Prometheus listen address, if metrics are enabled.
    #[must_use]
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.observability
            .metrics_addr
            .as_deref()
            .and_then(|addr| addr.parse().ok())
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Config path from `SYNC_CONFIG`, or `config.yaml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

static ENV_VAR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").ok());

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}`. Unset or empty variables
/// without a default become empty strings.
fn interpolate_env_vars(input: &str) -> String {
    let Some(re) = ENV_VAR.as_ref() else {
        return input.to_string();
    };

    re.replace_all(input, |caps: &Captures<'_>| {
        let default = caps.get(2).map_or("", |m| m.as_str());
        match std::env::var(&caps[1]) {
            Ok(value) if !value.is_empty() => value,
            _ => default.to_string(),
        }
    })
    .into_owned()
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

fn non_negative_seconds(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!("{field} must be a non-negative number")));
    }
    if Duration::try_from_secs_f64(value).is_err() {
        return Err(invalid(format!("{field} is too large")));
    }
    Ok(())
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    config
        .pricing
        .validate()
        .map_err(|e| invalid(format!("pricing: {e}")))?;

    let retry = &config.retry;
    if retry.max_attempts < 1 {
        return Err(invalid("retry.max_attempts must be at least 1"));
    }
    if retry.session_rotation_threshold < 1 {
        return Err(invalid("retry.session_rotation_threshold must be at least 1"));
    }
    if retry.consecutive_failure_threshold < 1 {
        return Err(invalid(
            "retry.consecutive_failure_threshold must be at least 1",
        ));
    }
    non_negative_seconds("retry.base_delay_seconds", retry.base_delay_seconds)?;
    non_negative_seconds("retry.max_delay_seconds", retry.max_delay_seconds)?;
    non_negative_seconds("retry.jitter_seconds", retry.jitter_seconds)?;

    let sync = &config.sync;
    if sync.concurrency < 1 {
        return Err(invalid("sync.concurrency must be at least 1"));
    }
    non_negative_seconds(
        "sync.global_min_interval_seconds",
        sync.global_min_interval_seconds,
    )?;
    if sync.price_epsilon.is_sign_negative() && !sync.price_epsilon.is_zero() {
        return Err(invalid("sync.price_epsilon must not be negative"));
    }

    if config.source.base_url.trim().is_empty() {
        return Err(invalid("source.base_url must not be empty"));
    }
    if config.marketplace.base_url.trim().is_empty() {
        return Err(invalid("marketplace.base_url must not be empty"));
    }
    if !config.persistence.in_memory && config.persistence.database_path.trim().is_empty() {
        return Err(invalid(
            "persistence.database_path is required unless in_memory is set",
        ));
    }

    if let Some(addr) = &config.observability.metrics_addr
        && addr.parse::<SocketAddr>().is_err()
    {
        return Err(invalid(format!(
            "observability.metrics_addr '{addr}' is not a socket address"
        )));
    }

    Ok(())
}
