//! Command/event bridge to the backend process.
//!
//! All real work (authentication, cookie extraction, downloads, dependency
//! installation) happens in a separate backend service. This module defines
//! the command surface ([`Backend`]), the pushed-event stream, and the
//! socket transport that carries both. Every command is async, may fail
//! with a human-readable message, and has no partial results; progress
//! arrives only through the event stream.

mod error;
mod events;
pub mod socket;
mod types;

pub use error::BridgeError;
pub use events::{BackendEvent, EventSubscription};
pub use socket::SocketBackend;
pub use types::{CookieStatus, DependencyReport, DownloadId, ToolKind, ToolStatus};

use async_trait::async_trait;

use crate::settings::SettingsRecord;

/// The backend command surface.
///
/// Implemented by [`SocketBackend`] in production and by scripted mocks in
/// tests. Components take `&dyn Backend` so the transport is swappable.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Current persisted settings record.
    async fn get_settings(&self) -> Result<SettingsRecord, BridgeError>;

    /// Persists `record`, replacing the stored settings wholesale.
    async fn save_settings(&self, record: &SettingsRecord) -> Result<(), BridgeError>;

    /// Fresh snapshot of every dependency signal.
    async fn dependency_report(&self) -> Result<DependencyReport, BridgeError>;

    /// Install state of a single tool.
    async fn check_tool(&self, tool: ToolKind) -> Result<ToolStatus, BridgeError>;

    /// Installs `tool`. Resolves once the install finished; failure carries
    /// the installer's error output.
    async fn install_tool(&self, tool: ToolKind) -> Result<(), BridgeError>;

    /// Checks the currently stored cookies against Apple Music.
    async fn validate_cookies(&self) -> Result<CookieStatus, BridgeError>;

    /// Imports a Netscape cookies file from `path` and validates it.
    async fn import_cookies(&self, path: &str) -> Result<CookieStatus, BridgeError>;

    /// Queues a download; progress is reported through events.
    async fn enqueue_download(&self, url: &str) -> Result<DownloadId, BridgeError>;

    /// Whether first-run setup has been completed before.
    async fn is_setup_complete(&self) -> Result<bool, BridgeError>;

    /// Records that first-run setup finished.
    async fn mark_setup_complete(&self) -> Result<(), BridgeError>;

    /// Subscribes to pushed events from this point onward.
    fn subscribe(&self) -> EventSubscription;
}
