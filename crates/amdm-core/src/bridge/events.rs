//! Backend-pushed events and the subscription handle.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{DownloadId, ToolKind};

/// Event pushed by the backend without a matching request.
///
/// On the wire each event is a line `{"event": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum BackendEvent {
    DownloadQueued {
        id: DownloadId,
        url: String,
    },
    DownloadProgress {
        id: DownloadId,
        bytes_done: u64,
        #[serde(default)]
        total_bytes: Option<u64>,
    },
    DownloadCompleted {
        id: DownloadId,
    },
    DownloadFailed {
        id: DownloadId,
        message: String,
    },
    /// Login flow finished and cookies were written to `path`.
    CookiesExtracted {
        path: String,
    },
    ToolInstalled {
        tool: ToolKind,
    },
}

/// Live subscription to backend events.
///
/// Dropping the handle unsubscribes; there is no explicit teardown call.
/// Each subscriber sees every event from its subscription point onward.
pub struct EventSubscription {
    rx: broadcast::Receiver<BackendEvent>,
}

impl EventSubscription {
    /// Wraps a broadcast receiver. Backend implementations call this from
    /// their `subscribe`; consumers only ever receive.
    pub fn new(rx: broadcast::Receiver<BackendEvent>) -> Self {
        Self { rx }
    }

    /// Next event, or `None` once the backend side is gone. A slow consumer
    /// that misses events skips them rather than erroring.
    pub async fn recv(&mut self) -> Option<BackendEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("event subscriber lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
