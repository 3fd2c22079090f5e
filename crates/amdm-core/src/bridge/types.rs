//! Status types exchanged with the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the backend assigns to a queued download.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct DownloadId(pub u64);

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External tool the downloader depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Python,
    Gamdl,
    Ffmpeg,
    Mp4decrypt,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Python,
        ToolKind::Gamdl,
        ToolKind::Ffmpeg,
        ToolKind::Mp4decrypt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Python => "python",
            ToolKind::Gamdl => "gamdl",
            ToolKind::Ffmpeg => "ffmpeg",
            ToolKind::Mp4decrypt => "mp4decrypt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Python => "Python",
            ToolKind::Gamdl => "gamdl",
            ToolKind::Ffmpeg => "FFmpeg",
            ToolKind::Mp4decrypt => "mp4decrypt",
        }
    }
}

/// Install state of one external tool.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolStatus {
    pub installed: bool,
    /// Reported version string when installed and detectable.
    #[serde(default)]
    pub version: Option<String>,
}

impl ToolStatus {
    pub fn installed(version: impl Into<String>) -> Self {
        Self {
            installed: true,
            version: Some(version.into()),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

/// Validity of the stored Apple Music cookies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CookieStatus {
    pub valid: bool,
    /// Failure detail when invalid ("file not found", "expired", ...).
    #[serde(default)]
    pub detail: Option<String>,
}

impl CookieStatus {
    pub fn valid() -> Self {
        Self {
            valid: true,
            detail: None,
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self {
            valid: false,
            detail: Some(detail.into()),
        }
    }
}

/// One snapshot of every external signal the setup flow cares about.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DependencyReport {
    pub python: ToolStatus,
    pub gamdl: ToolStatus,
    pub ffmpeg: ToolStatus,
    pub mp4decrypt: ToolStatus,
    pub cookies: CookieStatus,
}

impl DependencyReport {
    /// Status of one tool by kind.
    pub fn tool(&self, kind: ToolKind) -> &ToolStatus {
        match kind {
            ToolKind::Python => &self.python,
            ToolKind::Gamdl => &self.gamdl,
            ToolKind::Ffmpeg => &self.ffmpeg,
            ToolKind::Mp4decrypt => &self.mp4decrypt,
        }
    }

    /// Tools not currently installed, in canonical order.
    pub fn missing_tools(&self) -> Vec<ToolKind> {
        ToolKind::ALL
            .into_iter()
            .filter(|kind| !self.tool(*kind).installed)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_lookup_covers_all_kinds() {
        let report = DependencyReport {
            python: ToolStatus::installed("3.12.1"),
            ..DependencyReport::default()
        };
        assert!(report.tool(ToolKind::Python).installed);
        assert!(!report.tool(ToolKind::Gamdl).installed);
        assert_eq!(
            report.missing_tools(),
            vec![ToolKind::Gamdl, ToolKind::Ffmpeg, ToolKind::Mp4decrypt]
        );
    }

    #[test]
    fn report_json_round_trip() {
        let report = DependencyReport {
            python: ToolStatus::installed("3.12.1"),
            gamdl: ToolStatus::missing(),
            ffmpeg: ToolStatus::installed("7.0"),
            mp4decrypt: ToolStatus::missing(),
            cookies: CookieStatus::invalid("no cookies file"),
        };
        let json = serde_json::to_string(&report).unwrap();
        let parsed: DependencyReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn tool_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ToolKind::Mp4decrypt).unwrap(),
            "\"mp4decrypt\""
        );
        for kind in ToolKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
