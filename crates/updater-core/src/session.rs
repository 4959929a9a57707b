// ── Session ──
//
// Bundles one client with one instance of every store. Consumers hold a
// `Session` and reach each store through it.

use std::sync::Arc;

use tracing::debug;
use updater_api::{HealthStatus, TransportConfig, UpdaterClient};

use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::preferences::Preferences;
use crate::store::{ConfigStore, HistoryStore, TaskStore, ThemeStore};

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<SessionInner>`. Building a session does
/// no I/O besides reading the stored theme preference.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: Arc<UpdaterClient>,
    config: ConfigStore,
    history: HistoryStore,
    tasks: TaskStore,
    theme: ThemeStore,
}

impl Session {
    /// Build the HTTP client described by `config` and wire up the stores.
    pub fn new(config: &SessionConfig, prefs: Arc<dyn Preferences>) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = UpdaterClient::new(config.url.clone(), &transport)?;
        debug!(url = %config.url, timeout = ?config.timeout, "session created");
        Ok(Self::with_client(client, prefs))
    }

    /// Wire up the stores around an existing client.
    pub fn with_client(client: UpdaterClient, prefs: Arc<dyn Preferences>) -> Self {
        let client = Arc::new(client);
        Self {
            inner: Arc::new(SessionInner {
                config: ConfigStore::new(Arc::clone(&client)),
                history: HistoryStore::new(Arc::clone(&client)),
                tasks: TaskStore::new(Arc::clone(&client)),
                theme: ThemeStore::new(prefs),
                client,
            }),
        }
    }

    pub fn client(&self) -> &Arc<UpdaterClient> {
        &self.inner.client
    }

    pub fn config(&self) -> &ConfigStore {
        &self.inner.config
    }

    pub fn history(&self) -> &HistoryStore {
        &self.inner.history
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.inner.tasks
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.inner.theme
    }

    /// Probe the service's liveness endpoint.
    pub async fn health(&self) -> Result<HealthStatus, CoreError> {
        Ok(self.inner.client.health().await?)
    }
}
