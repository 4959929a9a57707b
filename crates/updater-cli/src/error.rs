//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ConfigError`, and failed store outcomes into
//! user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use updater_config::ConfigError;
use updater_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

/// Message the transport uses when nothing came back.
const UNRESPONSIVE: &str = "server unresponsive, check network connectivity";

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(mihomo_updater::unreachable),
        help(
            "Check that the update service is running and reachable.\n\
             Point at another instance with --server or a profile: \
             mihomo-updater profiles add <name> --url <URL>"
        )
    )]
    Unreachable { message: String },

    // ── Service responses ────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(mihomo_updater::request_failed))]
    Request {
        message: String,
        status: Option<u16>,
    },

    #[error("{action} failed: {message}")]
    #[diagnostic(
        code(mihomo_updater::action_failed),
        help("Run: mihomo-updater history --failed for details")
    )]
    ActionFailed { action: String, message: String },

    #[error("configuration key '{key}' not found")]
    #[diagnostic(
        code(mihomo_updater::key_not_found),
        help("Run: mihomo-updater config show to list available keys")
    )]
    KeyNotFound { key: String },

    #[error("service reported status '{status}'")]
    #[diagnostic(code(mihomo_updater::unhealthy))]
    Unhealthy { status: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mihomo_updater::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mihomo_updater::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mihomo-updater profiles add <name> --url <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(mihomo_updater::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(mihomo_updater::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(mihomo_updater::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(mihomo_updater::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unreachable { .. } => exit_code::CONNECTION,
            Self::KeyNotFound { .. }
            | Self::ProfileNotFound { .. }
            | Self::Request {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Error for a store whose last operation left `message` in its state.
    pub fn from_store(message: String) -> Self {
        if message == UNRESPONSIVE {
            Self::Unreachable { message }
        } else {
            Self::Request {
                message,
                status: None,
            }
        }
    }

    /// Error for a task action the service reported as failed.
    pub fn action(action: &str, message: String) -> Self {
        if message == UNRESPONSIVE {
            Self::Unreachable { message }
        } else {
            Self::ActionFailed {
                action: action.into(),
                message,
            }
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unreachable { message } => CliError::Unreachable { message },
            CoreError::Request { message, status } => CliError::Request { message, status },
            CoreError::Config { message } => CliError::Validation {
                field: "server".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
