//! The settings record and partial updates to it.

use serde::{Deserialize, Serialize};

use super::options::{CoverFormat, LyricsFormat, SongCodec, VideoResolution};

/// User preferences, owned and persisted by the backend.
///
/// This is the exact record exchanged over the bridge; the frontend only
/// ever edits an in-memory working copy (see [`super::SettingsStore`]).
/// The two priority lists are fallback chains: the downloader tries each
/// entry in order until one succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Destination directory; `None` lets the backend pick its default.
    #[serde(default)]
    pub download_dir: Option<String>,
    /// Path to the Netscape cookies file; `None` until imported.
    #[serde(default)]
    pub cookies_path: Option<String>,
    /// Song codec fallback chain, highest priority first.
    pub song_codec_priority: Vec<SongCodec>,
    /// Music video resolution fallback chain, highest priority first.
    pub video_resolution_priority: Vec<VideoResolution>,
    pub cover_format: CoverFormat,
    /// Cover art edge size in pixels.
    pub cover_size: u32,
    pub save_cover: bool,
    pub save_lyrics: bool,
    pub lyrics_format: LyricsFormat,
    /// Overwrite existing files instead of skipping them.
    pub overwrite: bool,
    pub folder_template: String,
    pub file_template: String,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            download_dir: None,
            cookies_path: None,
            song_codec_priority: vec![SongCodec::AacLegacy, SongCodec::Aac, SongCodec::AacHe],
            video_resolution_priority: vec![
                VideoResolution::R1080,
                VideoResolution::R720,
                VideoResolution::R480,
            ],
            cover_format: CoverFormat::Jpg,
            cover_size: 1200,
            save_cover: false,
            save_lyrics: true,
            lyrics_format: LyricsFormat::Lrc,
            overwrite: false,
            folder_template: "{album_artist}/{album}".to_string(),
            file_template: "{track:02d} {title}".to_string(),
        }
    }
}

/// A partial update to a [`SettingsRecord`]: only `Some` fields are applied.
///
/// Nullable record fields use a double `Option`, so a patch can distinguish
/// "leave alone" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub download_dir: Option<Option<String>>,
    pub cookies_path: Option<Option<String>>,
    pub song_codec_priority: Option<Vec<SongCodec>>,
    pub video_resolution_priority: Option<Vec<VideoResolution>>,
    pub cover_format: Option<CoverFormat>,
    pub cover_size: Option<u32>,
    pub save_cover: Option<bool>,
    pub save_lyrics: Option<bool>,
    pub lyrics_format: Option<LyricsFormat>,
    pub overwrite: Option<bool>,
    pub folder_template: Option<String>,
    pub file_template: Option<String>,
}

impl SettingsPatch {
    /// Shallow field overwrite into `record`.
    pub fn apply(self, record: &mut SettingsRecord) {
        if let Some(v) = self.download_dir {
            record.download_dir = v;
        }
        if let Some(v) = self.cookies_path {
            record.cookies_path = v;
        }
        if let Some(v) = self.song_codec_priority {
            record.song_codec_priority = v;
        }
        if let Some(v) = self.video_resolution_priority {
            record.video_resolution_priority = v;
        }
        if let Some(v) = self.cover_format {
            record.cover_format = v;
        }
        if let Some(v) = self.cover_size {
            record.cover_size = v;
        }
        if let Some(v) = self.save_cover {
            record.save_cover = v;
        }
        if let Some(v) = self.save_lyrics {
            record.save_lyrics = v;
        }
        if let Some(v) = self.lyrics_format {
            record.lyrics_format = v;
        }
        if let Some(v) = self.overwrite {
            record.overwrite = v;
        }
        if let Some(v) = self.folder_template {
            record.folder_template = v;
        }
        if let Some(v) = self.file_template {
            record.file_template = v;
        }
    }

    /// True when the patch would not change anything (all fields `None`).
    pub fn is_empty(&self) -> bool {
        self.download_dir.is_none()
            && self.cookies_path.is_none()
            && self.song_codec_priority.is_none()
            && self.video_resolution_priority.is_none()
            && self.cover_format.is_none()
            && self.cover_size.is_none()
            && self.save_cover.is_none()
            && self.save_lyrics.is_none()
            && self.lyrics_format.is_none()
            && self.overwrite.is_none()
            && self.folder_template.is_none()
            && self.file_template.is_none()
    }
}
