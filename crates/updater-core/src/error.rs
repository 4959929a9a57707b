// ── Core error types ──
//
// Raised only outside the stores: building a session and one-shot probes.
// Store operations never return errors; they publish a message in their
// state instead.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Service unreachable: {message}")]
    Unreachable { message: String },

    #[error("{message}")]
    Request {
        message: String,
        /// HTTP status code (if a response was received).
        status: Option<u16>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<updater_api::Error> for CoreError {
    fn from(err: updater_api::Error) -> Self {
        match err {
            updater_api::Error::Config(message) => CoreError::Config { message },
            updater_api::Error::Unresponsive => CoreError::Unreachable {
                message: updater_api::Error::Unresponsive.to_string(),
            },
            other => CoreError::Request {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}
