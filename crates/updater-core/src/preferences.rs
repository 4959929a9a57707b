// ── On-device preferences ──
//
// A tiny synchronous key-value seam for client-local settings that never
// round-trip to the service (currently only the theme mode). Injected
// into stores so tests can swap in an in-memory backend.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;
use tracing::{debug, warn};

/// Process-wide key-value storage for client preferences.
///
/// Writes are single-key and last-writer-wins. Neither method can fail
/// observably: backends log I/O problems and carry on.
pub trait Preferences: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

// ── In-memory backend ───────────────────────────────────────────────

/// Volatile preferences, shared by every clone of the `Arc` holding it.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: DashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

// ── File backend ────────────────────────────────────────────────────

/// Preferences persisted as a flat TOML table.
///
/// The file is re-read on every `get`, so separate instances pointing at
/// the same path observe each other's writes. Writes go through a
/// sibling temp file and a rename.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read preferences");
                return BTreeMap::new();
            }
        };
        toml::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring malformed preferences file");
            BTreeMap::new()
        })
    }

    fn store(&self, values: &BTreeMap<String, String>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string(values)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl Preferences for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.load();
        values.insert(key.to_owned(), value.to_owned());
        match self.store(&values) {
            Ok(()) => debug!(key, value, "preference saved"),
            Err(e) => warn!(path = %self.path.display(), key, error = %e, "failed to save preference"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let prefs = MemoryPreferences::new();
        assert_eq!(prefs.get("k"), None);
        prefs.set("k", "v");
        prefs.set("k", "w");
        assert_eq!(prefs.get("k").as_deref(), Some("w"));
    }

    #[test]
    fn file_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");

        FilePreferences::new(&path).set("theme-mode", "false");

        let reopened = FilePreferences::new(&path);
        assert_eq!(reopened.get("theme-mode").as_deref(), Some("false"));
    }

    #[test]
    fn file_instances_share_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        let a = FilePreferences::new(&path);
        let b = FilePreferences::new(&path);

        a.set("theme-mode", "true");
        b.set("other", "1");

        assert_eq!(a.get("other").as_deref(), Some("1"));
        assert_eq!(b.get("theme-mode").as_deref(), Some("true"));
    }

    #[test]
    fn malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let prefs = FilePreferences::new(&path);
        assert_eq!(prefs.get("theme-mode"), None);

        prefs.set("theme-mode", "auto");
        assert_eq!(prefs.get("theme-mode").as_deref(), Some("auto"));
    }
}
