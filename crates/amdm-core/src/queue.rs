//! Download queue view-model fed by backend events.
//!
//! The backend owns the real queue; this store mirrors it for display.
//! Items enter through [`DownloadQueue::track`] (for downloads this frontend
//! enqueued) or through a `DownloadQueued` event (for downloads added
//! elsewhere), and all progress arrives through [`DownloadQueue::apply_event`].

use std::collections::BTreeMap;

use crate::bridge::{BackendEvent, DownloadId};
use crate::classify::{classify, ContentType};

/// Lifecycle of one tracked download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueState {
    Queued,
    Running,
    Completed,
    Failed { message: String },
}

impl QueueState {
    /// True once the download can no longer make progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueState::Completed | QueueState::Failed { .. })
    }
}

/// One download as shown in the queue view.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    pub id: DownloadId,
    pub url: String,
    /// Classified from the URL when the item was first seen.
    pub content_type: ContentType,
    pub state: QueueState,
    pub bytes_done: u64,
    /// Unknown until the backend reports a size.
    pub total_bytes: Option<u64>,
}

impl QueueItem {
    fn new(id: DownloadId, url: &str) -> Self {
        Self {
            id,
            url: url.to_string(),
            content_type: classify(url).content_type,
            state: QueueState::Queued,
            bytes_done: 0,
            total_bytes: None,
        }
    }

    /// Fraction complete in [0.0, 1.0]; `None` while the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        if self.state == QueueState::Completed {
            return Some(1.0);
        }
        let total = self.total_bytes?;
        if total == 0 {
            return Some(1.0);
        }
        Some((self.bytes_done as f64 / total as f64).min(1.0))
    }
}

/// Ordered store of queue items keyed by download id.
///
/// Single-threaded-cooperative like the other stores: the owner applies
/// events one at a time, so there is no internal locking.
#[derive(Debug, Default)]
pub struct DownloadQueue {
    items: BTreeMap<DownloadId, QueueItem>,
}

impl DownloadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a download this frontend enqueued. A no-op when the
    /// id is already tracked, so racing a `DownloadQueued` event is harmless.
    pub fn track(&mut self, id: DownloadId, url: &str) {
        self.items
            .entry(id)
            .or_insert_with(|| QueueItem::new(id, url));
    }

    /// Folds one pushed event into the store. `DownloadQueued` inserts
    /// unknown ids; every other event for an unknown id is dropped, as are
    /// events that do not concern the queue.
    pub fn apply_event(&mut self, event: &BackendEvent) {
        match event {
            BackendEvent::DownloadQueued { id, url } => self.track(*id, url),
            BackendEvent::DownloadProgress {
                id,
                bytes_done,
                total_bytes,
            } => {
                if let Some(item) = self.items.get_mut(id) {
                    item.state = QueueState::Running;
                    item.bytes_done = *bytes_done;
                    if total_bytes.is_some() {
                        item.total_bytes = *total_bytes;
                    }
                }
            }
            BackendEvent::DownloadCompleted { id } => {
                if let Some(item) = self.items.get_mut(id) {
                    item.state = QueueState::Completed;
                    if let Some(total) = item.total_bytes {
                        item.bytes_done = total;
                    }
                }
            }
            BackendEvent::DownloadFailed { id, message } => {
                if let Some(item) = self.items.get_mut(id) {
                    item.state = QueueState::Failed {
                        message: message.clone(),
                    };
                }
            }
            BackendEvent::CookiesExtracted { .. } | BackendEvent::ToolInstalled { .. } => {}
        }
    }

    pub fn get(&self, id: DownloadId) -> Option<&QueueItem> {
        self.items.get(&id)
    }

    /// Items in ascending id order (the order the backend assigned them).
    pub fn items(&self) -> impl Iterator<Item = &QueueItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
