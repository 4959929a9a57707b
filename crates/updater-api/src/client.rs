// Typed client for the update service.
//
// Thin wrapper over `Transport`. Endpoint methods live in the
// `resources` modules as inherent impls, one file per resource family,
// to keep this module focused on construction.

use url::Url;

use crate::error::Error;
use crate::transport::{Transport, TransportConfig};

/// Client for the update service's HTTP API.
///
/// Every endpoint method builds a path and payload, delegates to the
/// transport, and returns its result untouched.
#[derive(Debug, Clone)]
pub struct UpdaterClient {
    transport: Transport,
}

impl UpdaterClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: Url, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            transport: Transport::new(base_url, config)?,
        })
    }

    /// Create a client from an already-built transport.
    pub fn with_transport(transport: Transport) -> Self {
        Self { transport }
    }

    /// Parse `base_url` and create a client with default transport settings.
    pub fn from_url(base_url: &str) -> Result<Self, Error> {
        Transport::from_url(base_url).map(Self::with_transport)
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }
}
