use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Frontend configuration loaded from `~/.config/amdm/config.toml`.
///
/// Only transport plumbing lives here. User preferences (codecs, templates,
/// download directory) are owned by the backend and edited through the
/// settings store, never through this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmdmConfig {
    /// Backend socket path; `None` means the default under the state dir.
    #[serde(default)]
    pub socket_path: Option<PathBuf>,
    /// Seconds to wait for a single backend response.
    pub request_timeout_secs: u64,
}

impl Default for AmdmConfig {
    fn default() -> Self {
        Self {
            socket_path: None,
            request_timeout_secs: 30,
        }
    }
}

impl AmdmConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("amdm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AmdmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AmdmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: AmdmConfig = toml::from_str(&data)?;
    Ok(cfg)
}
