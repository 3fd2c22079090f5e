//! `amdm settings` – show and edit the backend settings record.

use amdm_core::bridge::Backend;
use amdm_core::settings::{
    CoverFormat, LyricsFormat, SettingsPatch, SettingsRecord, SettingsStore, SongCodec,
    VideoResolution,
};
use anyhow::{anyhow, Context, Result};

use crate::cli::SetArgs;

pub async fn run_settings_show(backend: &dyn Backend) -> Result<()> {
    let mut store = SettingsStore::new();
    store.load(backend).await.context("load settings")?;
    print_record(store.current());
    Ok(())
}

pub async fn run_settings_set(backend: &dyn Backend, args: SetArgs) -> Result<()> {
    let patch = build_patch(args)?;
    if patch.is_empty() {
        anyhow::bail!("nothing to change; see `amdm settings set --help` for the field flags");
    }
    let mut store = SettingsStore::new();
    store.load(backend).await.context("load settings")?;
    store.update(patch);
    store.save(backend).await.context("save settings")?;
    println!("Settings saved.");
    Ok(())
}

pub async fn run_settings_reset(backend: &dyn Backend) -> Result<()> {
    // No load needed: the defaults replace whatever is stored.
    let mut store = SettingsStore::new();
    store.reset_to_defaults();
    store.save(backend).await.context("save settings")?;
    println!("Settings reset to defaults.");
    Ok(())
}

pub async fn run_settings_move(
    backend: &dyn Backend,
    chain: &str,
    index: usize,
    direction: &str,
) -> Result<()> {
    let mut store = SettingsStore::new();
    store.load(backend).await.context("load settings")?;

    let moved = match (chain, direction) {
        ("codec", "up") => store.move_codec_up(index),
        ("codec", "down") => store.move_codec_down(index),
        ("resolution", "up") => store.move_resolution_up(index),
        ("resolution", "down") => store.move_resolution_down(index),
        ("codec", _) | ("resolution", _) => {
            anyhow::bail!("direction must be 'up' or 'down', got '{direction}'")
        }
        _ => anyhow::bail!("chain must be 'codec' or 'resolution', got '{chain}'"),
    };

    if !moved {
        println!("Nothing to move at index {index}.");
        return Ok(());
    }
    store.save(backend).await.context("save settings")?;

    let rendered = match chain {
        "codec" => join_codecs(&store.current().song_codec_priority),
        _ => join_resolutions(&store.current().video_resolution_priority),
    };
    println!("{chain}: {rendered}");
    Ok(())
}

fn print_record(record: &SettingsRecord) {
    let download_dir = record.download_dir.as_deref().unwrap_or("(backend default)");
    let cookies_path = record.cookies_path.as_deref().unwrap_or("(not set)");
    println!("{:<20} {}", "download-dir", download_dir);
    println!("{:<20} {}", "cookies-path", cookies_path);
    println!(
        "{:<20} {}",
        "song-codecs",
        join_codecs(&record.song_codec_priority)
    );
    println!(
        "{:<20} {}",
        "video-resolutions",
        join_resolutions(&record.video_resolution_priority)
    );
    println!("{:<20} {}", "cover-format", record.cover_format.as_str());
    println!("{:<20} {}", "cover-size", record.cover_size);
    println!("{:<20} {}", "save-cover", record.save_cover);
    println!("{:<20} {}", "save-lyrics", record.save_lyrics);
    println!("{:<20} {}", "lyrics-format", record.lyrics_format.as_str());
    println!("{:<20} {}", "overwrite", record.overwrite);
    println!("{:<20} {}", "folder-template", record.folder_template);
    println!("{:<20} {}", "file-template", record.file_template);
}

fn join_codecs(chain: &[SongCodec]) -> String {
    chain
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

fn join_resolutions(chain: &[VideoResolution]) -> String {
    chain
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

/// Turns the `set` flags into a patch, rejecting values outside the closed
/// option sets before anything reaches the backend.
fn build_patch(args: SetArgs) -> Result<SettingsPatch> {
    let mut patch = SettingsPatch::default();

    if args.clear_download_dir {
        patch.download_dir = Some(None);
    } else if let Some(dir) = args.download_dir {
        patch.download_dir = Some(Some(dir));
    }
    if args.clear_cookies_path {
        patch.cookies_path = Some(None);
    } else if let Some(path) = args.cookies_path {
        patch.cookies_path = Some(Some(path));
    }

    if let Some(list) = args.song_codecs {
        let allowed = SongCodec::ALL.map(|c| c.as_str());
        patch.song_codec_priority =
            Some(parse_chain(&list, "codec", SongCodec::from_str, &allowed)?);
    }
    if let Some(list) = args.video_resolutions {
        let allowed = VideoResolution::ALL.map(|r| r.as_str());
        patch.video_resolution_priority = Some(parse_chain(
            &list,
            "resolution",
            VideoResolution::from_str,
            &allowed,
        )?);
    }
    if let Some(format) = args.cover_format {
        let allowed = CoverFormat::ALL.map(|f| f.as_str());
        patch.cover_format = Some(parse_one(
            &format,
            "cover format",
            CoverFormat::from_str,
            &allowed,
        )?);
    }
    if let Some(format) = args.lyrics_format {
        let allowed = LyricsFormat::ALL.map(|f| f.as_str());
        patch.lyrics_format = Some(parse_one(
            &format,
            "lyrics format",
            LyricsFormat::from_str,
            &allowed,
        )?);
    }

    patch.cover_size = args.cover_size;
    patch.save_cover = args.save_cover;
    patch.save_lyrics = args.save_lyrics;
    patch.overwrite = args.overwrite;
    patch.folder_template = args.folder_template;
    patch.file_template = args.file_template;

    Ok(patch)
}

fn parse_one<T>(
    value: &str,
    what: &str,
    parse: impl Fn(&str) -> Option<T>,
    allowed: &[&str],
) -> Result<T> {
    parse(value).ok_or_else(|| {
        anyhow!(
            "unknown {what} '{value}' (expected one of: {})",
            allowed.join(", ")
        )
    })
}

/// Parses a comma-separated priority list. Blank entries are ignored; an
/// all-blank list is an error rather than an accidental wipe of the chain.
fn parse_chain<T>(
    list: &str,
    what: &str,
    parse: impl Fn(&str) -> Option<T>,
    allowed: &[&str],
) -> Result<Vec<T>> {
    let items = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_one(s, what, &parse, allowed))
        .collect::<Result<Vec<T>>>()?;
    if items.is_empty() {
        anyhow::bail!("empty {what} list");
    }
    Ok(items)
}
