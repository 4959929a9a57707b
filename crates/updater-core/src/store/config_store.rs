// ── Configuration store ──
//
// Holds the service configuration. Fetch replaces it wholesale; a
// successful save shallow-merges the submitted patch locally without
// re-reading the server.

use std::sync::Arc;

use tracing::{info, warn};
use updater_api::{ApiResponse, Config, ConfigPatch, UpdaterClient};

use super::state::{ActionResult, StateCell, StoreState, StoreWatch, failure_message};

const FETCH_FAILED: &str = "failed to fetch configuration";
const SAVE_FAILED: &str = "failed to update configuration";
const SAVED: &str = "configuration updated";

/// Reactive store for the service configuration.
///
/// Cheaply cloneable; clones share the same state.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<ConfigStoreInner>,
}

struct ConfigStoreInner {
    client: Arc<UpdaterClient>,
    state: StateCell<Config>,
}

impl ConfigStore {
    pub fn new(client: Arc<UpdaterClient>) -> Self {
        Self {
            inner: Arc::new(ConfigStoreInner {
                client,
                state: StateCell::new(),
            }),
        }
    }

    /// Current configuration (empty until the first successful fetch).
    pub fn config(&self) -> Config {
        self.inner.state.snapshot().data
    }

    pub fn state(&self) -> StoreState<Config> {
        self.inner.state.snapshot()
    }

    pub fn subscribe(&self) -> StoreWatch<Config> {
        StoreWatch::new(self.inner.state.subscribe())
    }

    /// Fetch the configuration, replacing local state on success.
    ///
    /// On failure `error` is set and the previous configuration is kept.
    pub async fn fetch_config(&self) {
        let op = self.inner.state.begin();
        match self.inner.client.get_config().await {
            Ok(ApiResponse {
                success: true,
                data: Some(config),
                ..
            }) => {
                info!(keys = config.len(), "configuration loaded");
                op.settle(|state| state.data = config);
            }
            Ok(res) => {
                let message = res.message_or(FETCH_FAILED);
                warn!(%message, "configuration fetch rejected");
                op.settle(|state| state.error = Some(message));
            }
            Err(err) => {
                let message = failure_message(&err, FETCH_FAILED);
                warn!(%message, "configuration fetch failed");
                op.settle(|state| state.error = Some(message));
            }
        }
    }

    /// Submit `patch` to the service.
    ///
    /// On success the patch is merged into the local configuration key by
    /// key, assuming the server stored it verbatim. The returned result and
    /// the store's `error` field always carry the same message on failure.
    pub async fn save_config(&self, patch: &ConfigPatch) -> ActionResult {
        let op = self.inner.state.begin();
        let response = self.inner.client.update_config(patch).await;
        let result = ActionResult::from_response(response, SAVED, SAVE_FAILED);

        if result.success {
            info!(keys = patch.len(), "configuration saved");
        } else {
            warn!(message = %result.message, "configuration save failed");
        }

        op.settle(|state| {
            if result.success {
                state.data.apply_patch(patch);
            } else {
                state.error = Some(result.message.clone());
            }
        });
        result
    }
}
