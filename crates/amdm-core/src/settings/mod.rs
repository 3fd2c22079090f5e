//! Settings record, option sets, and the dirty/save store.

pub mod chain;
mod options;
mod record;
mod store;

pub use options::{CoverFormat, LyricsFormat, SongCodec, VideoResolution};
pub use record::{SettingsPatch, SettingsRecord};
pub use store::{LoadTicket, SaveTicket, SettingsStore};
