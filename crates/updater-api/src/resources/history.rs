// Task history endpoint.

use tracing::debug;

use crate::client::UpdaterClient;
use crate::envelope::ApiResponse;
use crate::error::Error;
use crate::types::TaskHistory;

impl UpdaterClient {
    /// Fetch the task execution history, oldest first.
    ///
    /// `GET /api/history`
    pub async fn get_task_history(&self) -> Result<ApiResponse<Vec<TaskHistory>>, Error> {
        debug!("fetching task history");
        self.transport().get("/api/history", None).await
    }
}
