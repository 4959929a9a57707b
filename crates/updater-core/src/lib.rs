// updater-core: Reactive state layer between updater-api and consumers.

pub mod config;
pub mod error;
pub mod preferences;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SessionConfig;
pub use error::CoreError;
pub use preferences::{FilePreferences, MemoryPreferences, Preferences};
pub use session::Session;
pub use store::{
    ActionResult, ConfigStore, HistoryStore, StoreState, StoreStream, StoreWatch, TaskStore,
    THEME_KEY, ThemeMode, ThemeStore,
};

pub use updater_api::{Config, ConfigKey, ConfigPatch, HealthStatus, ImportFile, TaskHistory};
