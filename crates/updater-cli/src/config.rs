//! CLI configuration: thin wrapper around `updater_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--profile, --server, --timeout-ms).

use std::sync::Arc;

use clap::ValueEnum;
use tracing::warn;

use updater_config::{Profile, parse_server_url, profile_to_session_config};
use updater_core::{FilePreferences, Session, SessionConfig};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use updater_config::{Config, load_config, preferences_path, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config for commands that only read it. An unreadable file is logged
/// and replaced by defaults; `profiles` reports it as an error instead.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable config file, using defaults");
        Config::default()
    })
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Output format: flag > config default > table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// Color mode: flag > config default > auto.
pub fn color_mode(global: &GlobalOpts, config: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

/// Translate the active profile + global flags into a `SessionConfig`.
///
/// A profile named with `--profile` must exist. Without one, the
/// configured default is used if present, otherwise the built-in
/// defaults. Flag overrides take priority over profile values.
pub fn resolve_session_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<SessionConfig, CliError> {
    let name = config.active_profile_name(global.profile.as_deref());

    let mut profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(config),
            });
        }
        None => Profile::default(),
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if global.timeout_ms.is_some() {
        profile.timeout_ms = global.timeout_ms;
    }

    tracing::debug!(profile = %name, server = %profile.server, "resolved connection settings");
    Ok(profile_to_session_config(&profile)?)
}

/// Build a session against the resolved service, with file-backed preferences.
pub fn build_session(global: &GlobalOpts, config: &Config) -> Result<Session, CliError> {
    let session_config = resolve_session_config(global, config)?;
    Ok(Session::new(&session_config, file_preferences())?)
}

/// Preferences stored next to the user's other data files.
pub fn file_preferences() -> Arc<FilePreferences> {
    Arc::new(FilePreferences::new(preferences_path()))
}

/// Validate a URL given on the command line.
pub fn validate_server(raw: &str) -> Result<(), CliError> {
    parse_server_url(raw)?;
    Ok(())
}
