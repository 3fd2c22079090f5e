//! CLI for the AMDM Apple Music download manager.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use amdm_core::bridge::SocketBackend;
use amdm_core::config::{self, AmdmConfig};

use commands::{
    run_add, run_classify, run_completions, run_settings_move, run_settings_reset,
    run_settings_set, run_settings_show, run_setup,
};

/// Top-level CLI for the AMDM frontend.
#[derive(Debug, Parser)]
#[command(name = "amdm")]
#[command(about = "AMDM: Apple Music download manager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check whether a URL is a downloadable Apple Music link.
    Classify {
        /// URL to check.
        url: String,
    },

    /// Queue a download for an Apple Music URL.
    Add {
        /// Apple Music URL (song, album, playlist, music-video or artist).
        url: String,

        /// Stay attached and print progress until the download finishes.
        #[arg(long)]
        wait: bool,
    },

    /// Run first-time setup: install missing tools, import cookies.
    Setup {
        /// Complete the cookies step without importing a cookies file.
        #[arg(long)]
        skip_cookies: bool,

        /// Netscape cookies file to import.
        #[arg(long, value_name = "PATH", conflicts_with = "skip_cookies")]
        cookies: Option<String>,

        /// Run setup again even if it was already completed.
        #[arg(long)]
        force: bool,
    },

    /// Show or edit the backend settings record.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the current settings.
    Show,

    /// Update one or more settings fields and save.
    Set(SetArgs),

    /// Restore the default settings and save them.
    Reset,

    /// Move a fallback-chain entry one position up or down.
    Move {
        /// Which chain: "codec" or "resolution".
        chain: String,

        /// Zero-based index of the entry to move.
        index: usize,

        /// Direction: "up" or "down".
        direction: String,
    },
}

/// Field flags for `settings set`. Only the flags that are given change.
#[derive(Debug, Default, Args)]
pub struct SetArgs {
    /// Download directory.
    #[arg(long, value_name = "DIR")]
    pub download_dir: Option<String>,

    /// Clear the download directory (fall back to the backend default).
    #[arg(long, conflicts_with = "download_dir")]
    pub clear_download_dir: bool,

    /// Path to the Netscape cookies file.
    #[arg(long, value_name = "PATH")]
    pub cookies_path: Option<String>,

    /// Clear the stored cookies path.
    #[arg(long, conflicts_with = "cookies_path")]
    pub clear_cookies_path: bool,

    /// Song codec fallback chain, comma-separated, highest priority first.
    #[arg(long, value_name = "LIST")]
    pub song_codecs: Option<String>,

    /// Video resolution fallback chain, comma-separated, highest first.
    #[arg(long, value_name = "LIST")]
    pub video_resolutions: Option<String>,

    /// Cover art format: jpg, png or raw.
    #[arg(long, value_name = "FORMAT")]
    pub cover_format: Option<String>,

    /// Cover art edge size in pixels.
    #[arg(long, value_name = "PX")]
    pub cover_size: Option<u32>,

    /// Save cover art next to the downloaded files (true/false).
    #[arg(long, value_name = "BOOL")]
    pub save_cover: Option<bool>,

    /// Save synced lyrics (true/false).
    #[arg(long, value_name = "BOOL")]
    pub save_lyrics: Option<bool>,

    /// Lyrics file format: lrc, srt or ttml.
    #[arg(long, value_name = "FORMAT")]
    pub lyrics_format: Option<String>,

    /// Overwrite existing files instead of skipping them (true/false).
    #[arg(long, value_name = "BOOL")]
    pub overwrite: Option<bool>,

    /// Folder name template.
    #[arg(long, value_name = "TEMPLATE")]
    pub folder_template: Option<String>,

    /// File name template.
    #[arg(long, value_name = "TEMPLATE")]
    pub file_template: Option<String>,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Classify { url } => run_classify(&url),
            CliCommand::Add { url, wait } => {
                let backend = connect(&cfg).await?;
                run_add(&backend, &url, wait).await
            }
            CliCommand::Setup {
                skip_cookies,
                cookies,
                force,
            } => {
                let backend = connect(&cfg).await?;
                run_setup(&backend, skip_cookies, cookies.as_deref(), force).await
            }
            CliCommand::Settings { action } => {
                let backend = connect(&cfg).await?;
                match action {
                    SettingsAction::Show => run_settings_show(&backend).await,
                    SettingsAction::Set(args) => run_settings_set(&backend, args).await,
                    SettingsAction::Reset => run_settings_reset(&backend).await,
                    SettingsAction::Move {
                        chain,
                        index,
                        direction,
                    } => run_settings_move(&backend, &chain, index, &direction).await,
                }
            }
            CliCommand::Completions { shell } => {
                run_completions(shell);
                Ok(())
            }
        }
    }
}

async fn connect(cfg: &AmdmConfig) -> Result<SocketBackend> {
    SocketBackend::connect_default(cfg)
        .await
        .context("cannot reach the amdm backend service")
}

#[cfg(test)]
mod tests;
