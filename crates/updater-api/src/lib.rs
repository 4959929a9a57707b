// updater-api: Async Rust client for the Mihomo auto-update service HTTP API

pub mod client;
pub mod envelope;
pub mod error;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::UpdaterClient;
pub use envelope::{Ack, ApiResponse};
pub use error::Error;
pub use transport::{Query, RequestBody, Transport, TransportConfig};
pub use types::{Config, ConfigKey, ConfigPatch, HealthStatus, ImportFile, TaskHistory};
