// ── Runtime session configuration ──
//
// Describes *where* the service lives and how to talk to it. Never
// touches disk; the CLI builds a `SessionConfig` and hands it in.

use std::time::Duration;

use url::Url;

use updater_api::transport::DEFAULT_TIMEOUT;

/// Configuration for one client session against one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Service base URL (e.g., `http://192.168.1.2:5000`).
    pub url: Url,
    /// Request timeout.
    pub timeout: Duration,
}

impl SessionConfig {
    /// Config for `url` with the standard 15s timeout.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
