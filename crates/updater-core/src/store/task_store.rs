// ── Remote task actions ──
//
// Manual triggers for the service's background jobs. Each action runs
// through the same loading/error lifecycle as the fetch stores and keeps
// its outcome as `data`.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};
use updater_api::{Ack, Error, ImportFile, UpdaterClient};

use super::state::{ActionResult, StateCell, StoreState, StoreWatch};

/// Reactive store for update triggers and local file import.
#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<TaskStoreInner>,
}

struct TaskStoreInner {
    client: Arc<UpdaterClient>,
    state: StateCell<Option<ActionResult>>,
}

impl TaskStore {
    pub fn new(client: Arc<UpdaterClient>) -> Self {
        Self {
            inner: Arc::new(TaskStoreInner {
                client,
                state: StateCell::new(),
            }),
        }
    }

    /// Outcome of the most recently settled action.
    pub fn last_result(&self) -> Option<ActionResult> {
        self.inner.state.snapshot().data
    }

    pub fn state(&self) -> StoreState<Option<ActionResult>> {
        self.inner.state.snapshot()
    }

    pub fn subscribe(&self) -> StoreWatch<Option<ActionResult>> {
        StoreWatch::new(self.inner.state.subscribe())
    }

    /// Refresh the Mihomo configuration from its subscription source now.
    pub async fn update_mihomo(&self) -> ActionResult {
        let client = &self.inner.client;
        self.run(
            "mihomo update",
            client.update_mihomo(),
            "mihomo update completed",
            "mihomo update failed",
        )
        .await
    }

    /// Refresh the GeoIP / GeoSite databases now.
    pub async fn update_geoip(&self) -> ActionResult {
        let client = &self.inner.client;
        self.run(
            "geoip update",
            client.update_geoip(),
            "geoip update completed",
            "geoip update failed",
        )
        .await
    }

    /// Upload `file` and import it as the Mihomo configuration.
    pub async fn import_local(&self, file: ImportFile) -> ActionResult {
        let client = &self.inner.client;
        self.run(
            "local import",
            client.import_local(file),
            "import completed",
            "import failed",
        )
        .await
    }

    async fn run(
        &self,
        action: &str,
        request: impl Future<Output = Result<Ack, Error>>,
        ok_fallback: &str,
        err_fallback: &str,
    ) -> ActionResult {
        let op = self.inner.state.begin();
        let result = ActionResult::from_response(request.await, ok_fallback, err_fallback);

        if result.success {
            info!(action, message = %result.message, "task action succeeded");
        } else {
            warn!(action, message = %result.message, "task action failed");
        }

        op.settle(|state| {
            if !result.success {
                state.error = Some(result.message.clone());
            }
            state.data = Some(result.clone());
        });
        result
    }
}
