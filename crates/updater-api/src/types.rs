// Wire types for the update service.
//
// `Config` is deliberately loose: the service owns the schema and may add
// keys at any time, so the whole object is kept as a JSON map with typed
// accessors for the settings this client knows about.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── Config ──────────────────────────────────────────────────────────

/// Settings the service is known to expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ConfigKey {
    FetchUrl,
    FetchInterval,
    GeoipFetchInterval,
    MihomoConfigPath,
    BackupDir,
    GeoipUrl,
    GeositeUrl,
    MmdbUrl,
    GeoipPath,
    GeositePath,
    MmdbPath,
    YacdUrl,
    ClashApiUrl,
    WebPort,
}

/// Service configuration object.
///
/// Unknown keys are retained as-is; nothing is type-checked on decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: ConfigKey) -> Option<&str> {
        self.0.get(key.as_ref()).and_then(Value::as_str)
    }

    /// Unsigned integer value of `key`, if present and numeric.
    pub fn get_u64(&self, key: ConfigKey) -> Option<u64> {
        self.0.get(key.as_ref()).and_then(Value::as_u64)
    }

    pub fn fetch_url(&self) -> Option<&str> {
        self.get_str(ConfigKey::FetchUrl)
    }

    /// Subscription refresh interval in seconds.
    pub fn fetch_interval(&self) -> Option<u64> {
        self.get_u64(ConfigKey::FetchInterval)
    }

    /// GeoIP refresh interval in seconds.
    pub fn geoip_fetch_interval(&self) -> Option<u64> {
        self.get_u64(ConfigKey::GeoipFetchInterval)
    }

    pub fn backup_dir(&self) -> Option<&str> {
        self.get_str(ConfigKey::BackupDir)
    }

    pub fn web_port(&self) -> Option<u16> {
        self.get_u64(ConfigKey::WebPort)
            .and_then(|p| u16::try_from(p).ok())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Shallow merge: every key in `patch` overwrites the same key here.
    /// Keys not in the patch are left untouched.
    pub fn apply_patch(&mut self, patch: &ConfigPatch) {
        for (key, value) in patch.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Config {
    fn from(values: Map<String, Value>) -> Self {
        Self(values)
    }
}

/// A partial configuration update, sent verbatim to `POST /api/config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigPatch(Map<String, Value>);

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<Map<String, Value>> for ConfigPatch {
    fn from(values: Map<String, Value>) -> Self {
        Self(values)
    }
}

// ── Task history ────────────────────────────────────────────────────

/// One past execution of a background task, as recorded by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistory {
    pub timestamp: String,
    pub task: String,
    pub success: bool,
    pub message: String,
}

impl TaskHistory {
    /// Parse `timestamp`. Accepts the service's `YYYY-mm-dd HH:MM:SS`
    /// local form as well as RFC 3339.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%d %H:%M:%S")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(&self.timestamp)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
    }
}

// ── Health ──────────────────────────────────────────────────────────

/// Body of `GET /health`. Not wrapped in the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

// ── File import ─────────────────────────────────────────────────────

/// A local file to upload through `POST /api/import/local`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImportFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, using its final path component as the
    /// upload file name.
    pub async fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "config.yaml".into(), |n| n.to_string_lossy().into_owned());
        Ok(Self { file_name, bytes })
    }
}
