//! Dirty/save state machine over the settings record.
//!
//! The store owns the in-memory working copy of the settings. Edits mark it
//! dirty; a successful load or save marks it clean. Loads and saves run
//! against the backend and are stamped with a revision counter so a slow
//! response cannot clobber edits made while it was in flight.
//!
//! The two-phase pairs (`begin_load`/`finish_load`, `begin_save`/
//! `finish_save`) are the actual state machine; [`SettingsStore::load`] and
//! [`SettingsStore::save`] wrap them for callers that drive the backend
//! round-trip themselves.

use crate::bridge::{Backend, BridgeError};

use super::chain;
use super::record::{SettingsPatch, SettingsRecord};

/// Stamp taken when a load is issued; consumed when it completes.
#[derive(Debug)]
#[must_use = "a started load must be finished"]
pub struct LoadTicket {
    revision: u64,
}

/// Stamp and snapshot taken when a save is issued.
#[derive(Debug)]
#[must_use = "a started save must be finished"]
pub struct SaveTicket {
    revision: u64,
}

/// Working copy of the settings plus its dirty/in-flight bookkeeping.
#[derive(Debug)]
pub struct SettingsStore {
    current: SettingsRecord,
    dirty: bool,
    loading: bool,
    saving: bool,
    last_error: Option<String>,
    /// Bumped on every mutation; lets in-flight round-trips detect staleness.
    revision: u64,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    /// A clean store holding the default record (callers normally `load`
    /// right after construction).
    pub fn new() -> Self {
        Self {
            current: SettingsRecord::default(),
            dirty: false,
            loading: false,
            saving: false,
            last_error: None,
            revision: 0,
        }
    }

    pub fn current(&self) -> &SettingsRecord {
        &self.current
    }

    /// True iff `current` differs from the last successfully loaded or
    /// saved record (tracked by mutation, not by comparison).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Message from the most recent failed round-trip, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn mark_mutated(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Merges a partial update into the record. Always marks the store
    /// dirty, even for a patch that rewrites identical values.
    pub fn update(&mut self, patch: SettingsPatch) {
        patch.apply(&mut self.current);
        self.mark_mutated();
    }

    /// Replaces the record with the defaults. The defaults are not
    /// persisted until the caller saves, so this dirties the store.
    pub fn reset_to_defaults(&mut self) {
        self.current = SettingsRecord::default();
        self.mark_mutated();
    }

    /// Moves a song codec one position earlier in the fallback chain.
    pub fn move_codec_up(&mut self, index: usize) -> bool {
        let moved = chain::move_up(&mut self.current.song_codec_priority, index);
        if moved {
            self.mark_mutated();
        }
        moved
    }

    /// Moves a song codec one position later in the fallback chain.
    pub fn move_codec_down(&mut self, index: usize) -> bool {
        let moved = chain::move_down(&mut self.current.song_codec_priority, index);
        if moved {
            self.mark_mutated();
        }
        moved
    }

    /// Moves a video resolution one position earlier in the fallback chain.
    pub fn move_resolution_up(&mut self, index: usize) -> bool {
        let moved = chain::move_up(&mut self.current.video_resolution_priority, index);
        if moved {
            self.mark_mutated();
        }
        moved
    }

    /// Moves a video resolution one position later in the fallback chain.
    pub fn move_resolution_down(&mut self, index: usize) -> bool {
        let moved = chain::move_down(&mut self.current.video_resolution_priority, index);
        if moved {
            self.mark_mutated();
        }
        moved
    }

    /// Starts a load round-trip: raises the in-flight flag and stamps the
    /// request with the current revision.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loading = true;
        LoadTicket {
            revision: self.revision,
        }
    }

    /// Completes a load. On success the fetched record replaces `current`
    /// and the store becomes clean, unless the store was mutated after
    /// `begin_load`; a stale response is discarded so it cannot clobber the
    /// newer edits. On failure the record and dirty flag are untouched and
    /// the error is recorded and returned.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<SettingsRecord, BridgeError>,
    ) -> Result<(), BridgeError> {
        self.loading = false;
        match outcome {
            Ok(record) => {
                if ticket.revision == self.revision {
                    self.current = record;
                    self.dirty = false;
                    self.last_error = None;
                } else {
                    tracing::debug!(
                        stale = ticket.revision,
                        current = self.revision,
                        "discarding stale settings load"
                    );
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!("settings load failed: {}", err);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Starts a save round-trip: raises the in-flight flag and snapshots
    /// the record to send.
    pub fn begin_save(&mut self) -> (SaveTicket, SettingsRecord) {
        self.saving = true;
        (
            SaveTicket {
                revision: self.revision,
            },
            self.current.clone(),
        )
    }

    /// Completes a save. Success clears the dirty flag, unless the store
    /// was mutated after the snapshot was taken (those edits are still
    /// unsaved). Failure keeps the store dirty, records the error, and
    /// propagates it so the caller can react.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        outcome: Result<(), BridgeError>,
    ) -> Result<(), BridgeError> {
        self.saving = false;
        match outcome {
            Ok(()) => {
                if ticket.revision == self.revision {
                    self.dirty = false;
                    self.last_error = None;
                } else {
                    tracing::debug!("record changed during save; keeping dirty flag");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!("settings save failed: {}", err);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Fetches the record from the backend and applies it via
    /// [`Self::finish_load`].
    pub async fn load(&mut self, backend: &dyn Backend) -> Result<(), BridgeError> {
        let ticket = self.begin_load();
        let outcome = backend.get_settings().await;
        self.finish_load(ticket, outcome)
    }

    /// Sends the current record to the backend and applies the outcome via
    /// [`Self::finish_save`].
    pub async fn save(&mut self, backend: &dyn Backend) -> Result<(), BridgeError> {
        let (ticket, record) = self.begin_save();
        let outcome = backend.save_settings(&record).await;
        self.finish_save(ticket, outcome)
    }
}
