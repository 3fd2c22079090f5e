//! Closed option sets for the settings record.
//!
//! Every enum here maps both ways between its wire value (`as_str` /
//! `from_str`) and a display label. The sets are closed, so label lookups
//! are total; values outside a set are rejected at parse time.

use serde::{Deserialize, Serialize};

/// Song audio codec, in the order offered by the downloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SongCodec {
    AacLegacy,
    AacHeLegacy,
    Aac,
    AacHe,
    Alac,
    Atmos,
}

impl SongCodec {
    pub const ALL: [SongCodec; 6] = [
        SongCodec::AacLegacy,
        SongCodec::AacHeLegacy,
        SongCodec::Aac,
        SongCodec::AacHe,
        SongCodec::Alac,
        SongCodec::Atmos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SongCodec::AacLegacy => "aac-legacy",
            SongCodec::AacHeLegacy => "aac-he-legacy",
            SongCodec::Aac => "aac",
            SongCodec::AacHe => "aac-he",
            SongCodec::Alac => "alac",
            SongCodec::Atmos => "atmos",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            SongCodec::AacLegacy => "AAC 256kbps (legacy)",
            SongCodec::AacHeLegacy => "AAC-HE 64kbps (legacy)",
            SongCodec::Aac => "AAC 256kbps",
            SongCodec::AacHe => "AAC-HE 64kbps",
            SongCodec::Alac => "Lossless (ALAC)",
            SongCodec::Atmos => "Dolby Atmos",
        }
    }
}

/// Music video resolution cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoResolution {
    #[serde(rename = "2160p")]
    R2160,
    #[serde(rename = "1440p")]
    R1440,
    #[serde(rename = "1080p")]
    R1080,
    #[serde(rename = "720p")]
    R720,
    #[serde(rename = "480p")]
    R480,
}

impl VideoResolution {
    pub const ALL: [VideoResolution; 5] = [
        VideoResolution::R2160,
        VideoResolution::R1440,
        VideoResolution::R1080,
        VideoResolution::R720,
        VideoResolution::R480,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VideoResolution::R2160 => "2160p",
            VideoResolution::R1440 => "1440p",
            VideoResolution::R1080 => "1080p",
            VideoResolution::R720 => "720p",
            VideoResolution::R480 => "480p",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            VideoResolution::R2160 => "4K (2160p)",
            VideoResolution::R1440 => "1440p",
            VideoResolution::R1080 => "Full HD (1080p)",
            VideoResolution::R720 => "HD (720p)",
            VideoResolution::R480 => "SD (480p)",
        }
    }
}

/// Embedded/saved cover art format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverFormat {
    Jpg,
    Png,
    Raw,
}

impl CoverFormat {
    pub const ALL: [CoverFormat; 3] = [CoverFormat::Jpg, CoverFormat::Png, CoverFormat::Raw];

    pub fn as_str(self) -> &'static str {
        match self {
            CoverFormat::Jpg => "jpg",
            CoverFormat::Png => "png",
            CoverFormat::Raw => "raw",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            CoverFormat::Jpg => "JPEG",
            CoverFormat::Png => "PNG",
            CoverFormat::Raw => "Raw (as served)",
        }
    }
}

/// Synced lyrics file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsFormat {
    Lrc,
    Srt,
    Ttml,
}

impl LyricsFormat {
    pub const ALL: [LyricsFormat; 3] = [LyricsFormat::Lrc, LyricsFormat::Srt, LyricsFormat::Ttml];

    pub fn as_str(self) -> &'static str {
        match self {
            LyricsFormat::Lrc => "lrc",
            LyricsFormat::Srt => "srt",
            LyricsFormat::Ttml => "ttml",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            LyricsFormat::Lrc => "LRC",
            LyricsFormat::Srt => "SRT",
            LyricsFormat::Ttml => "TTML",
        }
    }
}
