// Service liveness probe.

use tracing::debug;

use crate::client::UpdaterClient;
use crate::error::Error;
use crate::types::HealthStatus;

impl UpdaterClient {
    /// Check that the service is up.
    ///
    /// `GET /health`. Answers `{"status": "ok"}` without the envelope.
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        debug!("checking service health");
        self.transport().get_raw("/health").await
    }
}
