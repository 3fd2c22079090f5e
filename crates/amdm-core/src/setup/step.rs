//! The fixed, ordered steps of first-run setup.

use serde::{Deserialize, Serialize};

use crate::bridge::ToolKind;

/// One stage of the setup sequence. The order is part of the state space,
/// not data: `ORDER` is the single source of truth for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupStep {
    Welcome,
    Python,
    Gamdl,
    Dependencies,
    Cookies,
    Complete,
}

impl SetupStep {
    /// All steps in wizard order.
    pub const ORDER: [SetupStep; 6] = [
        SetupStep::Welcome,
        SetupStep::Python,
        SetupStep::Gamdl,
        SetupStep::Dependencies,
        SetupStep::Cookies,
        SetupStep::Complete,
    ];

    /// Position of this step in [`Self::ORDER`].
    pub fn index(self) -> usize {
        match self {
            SetupStep::Welcome => 0,
            SetupStep::Python => 1,
            SetupStep::Gamdl => 2,
            SetupStep::Dependencies => 3,
            SetupStep::Cookies => 4,
            SetupStep::Complete => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ORDER.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SetupStep::Welcome => "welcome",
            SetupStep::Python => "python",
            SetupStep::Gamdl => "gamdl",
            SetupStep::Dependencies => "dependencies",
            SetupStep::Cookies => "cookies",
            SetupStep::Complete => "complete",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SetupStep::Welcome => "Welcome",
            SetupStep::Python => "Python runtime",
            SetupStep::Gamdl => "gamdl downloader",
            SetupStep::Dependencies => "Media tools",
            SetupStep::Cookies => "Apple Music cookies",
            SetupStep::Complete => "All set",
        }
    }

    /// Informational steps need no user action and complete themselves the
    /// moment they become current.
    pub fn is_informational(self) -> bool {
        matches!(self, SetupStep::Welcome | SetupStep::Complete)
    }

    /// Skippable steps offer an explicit skip that counts as completion
    /// without the external success signal.
    pub fn is_skippable(self) -> bool {
        matches!(self, SetupStep::Cookies)
    }

    /// Tools that must be installed before this step counts as satisfied.
    pub fn required_tools(self) -> &'static [ToolKind] {
        match self {
            SetupStep::Python => &[ToolKind::Python],
            SetupStep::Gamdl => &[ToolKind::Gamdl],
            SetupStep::Dependencies => &[ToolKind::Ffmpeg, ToolKind::Mp4decrypt],
            _ => &[],
        }
    }
}
