//! Shared configuration for mihomo-updater tools.
//!
//! TOML profiles layered with environment overrides, the on-disk
//! locations of the config and preferences files, and translation of a
//! profile into `updater_core::SessionConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use updater_core::SessionConfig;

/// Backend address used when no profile overrides it.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Profile selected when neither the file nor a flag names one.
pub const DEFAULT_PROFILE: &str = "default";

/// Prefix for environment overrides, e.g. `MIHOMO_UPDATER_DEFAULTS__OUTPUT`.
pub const ENV_PREFIX: &str = "MIHOMO_UPDATER_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles, kept sorted for stable listings.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: `requested`, else the configured
    /// default, else [`DEFAULT_PROFILE`].
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE)
            .to_owned()
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named service profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "http://192.168.1.2:5000").
    #[serde(default = "default_server")]
    pub server: String,

    /// Per-request timeout override in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_ms: None,
        }
    }
}

fn default_server() -> String {
    DEFAULT_SERVER.into()
}

// ── File locations ──────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "mihomo-updater", "mihomo-updater")
}

fn home_fallback(subdir: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(subdir);
    p.push("mihomo-updater");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the client preferences file (theme mode and friends).
pub fn preferences_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("preferences.toml"),
        |dirs| dirs.data_dir().join("preferences.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` (if present), then `MIHOMO_UPDATER_*`.
///
/// Nested keys use a double underscore: `MIHOMO_UPDATER_DEFAULTS__OUTPUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    Ok(figment.extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Session translation ─────────────────────────────────────────────

/// Parse and check a service URL. Only `http` and `https` are accepted.
pub fn parse_server_url(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|e| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

/// Build a `SessionConfig` from a profile. No CLI flag overrides.
pub fn profile_to_session_config(profile: &Profile) -> Result<SessionConfig, ConfigError> {
    let url = parse_server_url(&profile.server)?;
    let config = SessionConfig::new(url);
    match profile.timeout_ms {
        None => Ok(config),
        Some(0) => Err(ConfigError::Validation {
            field: "timeout_ms".into(),
            reason: "must be greater than zero".into(),
        }),
        Some(ms) => Ok(config.with_timeout(Duration::from_millis(ms))),
    }
}
