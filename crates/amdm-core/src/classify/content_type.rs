//! Apple Music content kinds derived from URL type segments.

use serde::{Deserialize, Serialize};

/// Kind of Apple Music resource a URL points to.
///
/// `Unknown` is reserved for input that does not classify; it never appears
/// for a URL that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Song,
    Album,
    Playlist,
    MusicVideo,
    Artist,
    Unknown,
}

impl ContentType {
    /// The URL path segment literal for this kind (`music-video` for `MusicVideo`).
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Song => "song",
            ContentType::Album => "album",
            ContentType::Playlist => "playlist",
            ContentType::MusicVideo => "music-video",
            ContentType::Artist => "artist",
            ContentType::Unknown => "unknown",
        }
    }

    /// Maps a URL type segment to a kind. `None` for anything outside the
    /// recognized set (`podcast`, `station`, typos, ...).
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "song" => Some(ContentType::Song),
            "album" => Some(ContentType::Album),
            "playlist" => Some(ContentType::Playlist),
            "music-video" => Some(ContentType::MusicVideo),
            "artist" => Some(ContentType::Artist),
            _ => None,
        }
    }

    /// Human-readable name for display.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Song => "Song",
            ContentType::Album => "Album",
            ContentType::Playlist => "Playlist",
            ContentType::MusicVideo => "Music Video",
            ContentType::Artist => "Artist",
            ContentType::Unknown => "Unknown",
        }
    }
}
