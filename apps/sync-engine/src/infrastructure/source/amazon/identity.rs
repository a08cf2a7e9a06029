//! Rotating network identity.
//!
//! An identity is a fresh HTTP client with its own cookie jar, connection
//! pool, and delivery location. Workers clone the current identity per
//! request; rotation swaps it atomically, so in-flight requests finish on the
//! old one. User-agents are drawn per request and never repeat back to back.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::seq::IndexedRandom;
use reqwest::Client;

use super::config::AmazonProbeConfig;
use crate::application::ports::{IdentityRotator, ProbeError};

/// One network identity.
#[derive(Debug, Clone)]
pub struct Identity {
    /// HTTP client with its own cookie store.
    pub client: Client,
    /// Rotation generation, starting at 0.
    pub generation: u64,
    located: Arc<Mutex<Option<String>>>,
}

impl Identity {
    fn fresh(client: Client, generation: u64) -> Self {
        Self {
            client,
            generation,
            located: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether this session already carries `postal_code` as its delivery location.
    #[must_use]
    pub fn is_located_at(&self, postal_code: &str) -> bool {
        self.located.lock().as_deref() == Some(postal_code)
    }

    /// Remember the delivery location stored in this session's cookies.
    pub fn mark_located(&self, postal_code: &str) {
        *self.located.lock() = Some(postal_code.to_string());
    }
}

/// Shared pool of identities.
#[derive(Debug)]
pub struct IdentityPool {
    user_agents: Vec<String>,
    timeout: std::time::Duration,
    current: RwLock<Identity>,
    last_agent: Mutex<Option<String>>,
}

impl IdentityPool {
    /// Create a pool and its first identity.
    pub fn new(config: &AmazonProbeConfig) -> Result<Arc<Self>, ProbeError> {
        let client = build_client(config.timeout)?;

        Ok(Arc::new(Self {
            user_agents: config.user_agent_pool(),
            timeout: config.timeout,
            current: RwLock::new(Identity::fresh(client, 0)),
            last_agent: Mutex::new(None),
        }))
    }

    /// Snapshot of the current identity.
    #[must_use]
    pub fn current(&self) -> Identity {
        self.current.read().clone()
    }

    /// Current rotation generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }

    /// User-agent for the next request, differing from the previous one when the pool allows it.
    #[must_use]
    pub fn next_user_agent(&self) -> String {
        let mut last = self.last_agent.lock();
        let user_agent = pick(&self.user_agents, last.as_deref());
        *last = Some(user_agent.clone());
        user_agent
    }
}

impl IdentityRotator for IdentityPool {
    fn rotate_identity(&self) {
        let client = match build_client(self.timeout) {
            Ok(client) => client,
            Err(error) => {
                tracing::warn!(%error, "Failed to build new session, keeping current identity");
                return;
            }
        };

        let mut current = self.current.write();
        *current = Identity::fresh(client, current.generation + 1);
    }
}
