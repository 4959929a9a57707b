// ── Reactive state stores ──
//
// One store per resource family. Each owns its slice of state and
// publishes every change through a `watch` channel.

mod config_store;
mod history_store;
mod state;
mod task_store;
mod theme_store;

pub use config_store::ConfigStore;
pub use history_store::HistoryStore;
pub use state::{ActionResult, StoreState, StoreStream, StoreWatch};
pub use task_store::TaskStore;
pub use theme_store::{THEME_KEY, ThemeMode, ThemeStore};
