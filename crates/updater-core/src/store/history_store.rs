// ── Task history store ──

use std::sync::Arc;

use tracing::{info, warn};
use updater_api::{ApiResponse, TaskHistory, UpdaterClient};

use super::state::{StateCell, StoreState, StoreWatch, failure_message};

const FETCH_FAILED: &str = "failed to fetch history";

/// Reactive store for the task execution history.
///
/// The list is a snapshot: every successful fetch replaces it whole.
#[derive(Clone)]
pub struct HistoryStore {
    inner: Arc<HistoryStoreInner>,
}

struct HistoryStoreInner {
    client: Arc<UpdaterClient>,
    state: StateCell<Vec<TaskHistory>>,
}

impl HistoryStore {
    pub fn new(client: Arc<UpdaterClient>) -> Self {
        Self {
            inner: Arc::new(HistoryStoreInner {
                client,
                state: StateCell::new(),
            }),
        }
    }

    pub fn history(&self) -> Vec<TaskHistory> {
        self.inner.state.snapshot().data
    }

    pub fn state(&self) -> StoreState<Vec<TaskHistory>> {
        self.inner.state.snapshot()
    }

    pub fn subscribe(&self) -> StoreWatch<Vec<TaskHistory>> {
        StoreWatch::new(self.inner.state.subscribe())
    }

    pub async fn fetch_history(&self) {
        let op = self.inner.state.begin();
        match self.inner.client.get_task_history().await {
            Ok(ApiResponse {
                success: true,
                data: Some(entries),
                ..
            }) => {
                info!(entries = entries.len(), "task history loaded");
                op.settle(|state| state.data = entries);
            }
            Ok(res) => {
                let message = res.message_or(FETCH_FAILED);
                warn!(%message, "task history fetch rejected");
                op.settle(|state| state.error = Some(message));
            }
            Err(err) => {
                let message = failure_message(&err, FETCH_FAILED);
                warn!(%message, "task history fetch failed");
                op.settle(|state| state.error = Some(message));
            }
        }
    }
}
