// ── Theme preference store ──
//
// Client-local only: no network, no loading/error lifecycle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tokio::sync::watch;
use tracing::debug;

use crate::preferences::Preferences;

/// Preference key the theme mode is persisted under.
pub const THEME_KEY: &str = "theme-mode";

/// Tri-state theme preference. Persisted as `auto`, `true`, or `false`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
pub enum ThemeMode {
    /// Follow the system setting.
    #[default]
    #[strum(serialize = "auto")]
    #[serde(rename = "auto")]
    Auto,
    /// Force dark.
    #[strum(serialize = "true")]
    #[serde(rename = "true")]
    Dark,
    /// Force light.
    #[strum(serialize = "false")]
    #[serde(rename = "false")]
    Light,
}

impl ThemeMode {
    /// Whether dark styling applies, given the system preference.
    pub fn is_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            Self::Auto => system_prefers_dark,
            Self::Dark => true,
            Self::Light => false,
        }
    }
}

impl From<bool> for ThemeMode {
    fn from(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }
}

/// Reactive store for the theme preference.
#[derive(Clone)]
pub struct ThemeStore {
    inner: Arc<ThemeStoreInner>,
}

struct ThemeStoreInner {
    prefs: Arc<dyn Preferences>,
    mode: watch::Sender<ThemeMode>,
}

impl ThemeStore {
    /// Create the store, reading the initial mode from `prefs`.
    ///
    /// A missing or unrecognised stored value yields [`ThemeMode::Auto`].
    pub fn new(prefs: Arc<dyn Preferences>) -> Self {
        let initial = prefs
            .get(THEME_KEY)
            .and_then(|raw| raw.parse::<ThemeMode>().ok())
            .unwrap_or_default();
        debug!(mode = %initial, "theme preference loaded");

        let (mode, _) = watch::channel(initial);
        Self {
            inner: Arc::new(ThemeStoreInner { prefs, mode }),
        }
    }

    /// Current theme mode.
    pub fn is_dark_mode(&self) -> ThemeMode {
        *self.inner.mode.borrow()
    }

    /// Set the mode and persist it immediately.
    pub fn set_theme(&self, mode: ThemeMode) {
        self.inner.mode.send_replace(mode);
        self.inner.prefs.set(THEME_KEY, mode.as_ref());
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.inner.mode.subscribe()
    }
}
