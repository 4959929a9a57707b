// Update triggers and local file import.

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::client::UpdaterClient;
use crate::envelope::Ack;
use crate::error::Error;
use crate::transport::RequestBody;
use crate::types::ImportFile;

/// Multipart field name the service reads the uploaded file from.
pub const IMPORT_FIELD: &str = "file";

impl UpdaterClient {
    /// Trigger an immediate refresh of the Mihomo configuration from the
    /// subscription source.
    ///
    /// `POST /api/update/mihomo`
    pub async fn update_mihomo(&self) -> Result<Ack, Error> {
        debug!("triggering mihomo update");
        self.transport().post("/api/update/mihomo", None).await
    }

    /// Trigger an immediate refresh of the GeoIP / GeoSite databases.
    ///
    /// `POST /api/update/geoip`
    pub async fn update_geoip(&self) -> Result<Ack, Error> {
        debug!("triggering geoip update");
        self.transport().post("/api/update/geoip", None).await
    }

    /// Upload a local YAML file and import it as the Mihomo configuration.
    ///
    /// `POST /api/import/local` (multipart, field `file`)
    pub async fn import_local(&self, file: ImportFile) -> Result<Ack, Error> {
        debug!(file = %file.file_name, size = file.bytes.len(), "importing local file");
        let part = Part::bytes(file.bytes).file_name(file.file_name);
        let form = Form::new().part(IMPORT_FIELD, part);
        self.transport()
            .post("/api/import/local", Some(RequestBody::Multipart(form)))
            .await
    }
}
