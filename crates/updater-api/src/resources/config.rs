// Configuration endpoints.

use tracing::debug;

use crate::client::UpdaterClient;
use crate::envelope::{Ack, ApiResponse};
use crate::error::Error;
use crate::transport::RequestBody;
use crate::types::{Config, ConfigPatch};

impl UpdaterClient {
    /// Fetch the current service configuration.
    ///
    /// `GET /api/config`
    pub async fn get_config(&self) -> Result<ApiResponse<Config>, Error> {
        debug!("fetching config");
        self.transport().get("/api/config", None).await
    }

    /// Submit a partial configuration. The service overwrites each
    /// supplied key and leaves the rest alone.
    ///
    /// `POST /api/config`
    pub async fn update_config(&self, patch: &ConfigPatch) -> Result<Ack, Error> {
        debug!(keys = patch.len(), "updating config");
        let body = RequestBody::json(patch)?;
        self.transport().post("/api/config", Some(body)).await
    }
}
