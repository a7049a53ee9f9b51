//! Keep a game's custom map folder and patch files in line with what their
//! publishers list.
//!
//! # Key Features
//!
//! - **Content addressed**: every file is identified by its SHA-256, on disk
//!   and over the wire
//! - **Never delete**: replaced files rotate into `.bak` slots and are swapped
//!   back when they match again
//! - **Bounded**: at most [`Config::concurrency`] files are reconciled at once
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = mapsync::Config::builtin()?;
//! let fetcher = mapsync::fetcher(&config)?;
//! let source = config.source("AlfredoAnonym/CoJ-BiB-CustomMaps")?;
//! let maps = mapsync::maps_dir(Path::new("/games/CoJBiB"))?;
//!
//! let report = mapsync::sync_manifest(&config, &fetcher, &maps, source, true, |_, name, status| {
//!     println!("{name}: {status}");
//! })
//! .await?;
//! println!("{} of {} up to date", report.count(mapsync::FileStatus::Ok), report.statuses.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use mapsync_fetch::{Fetcher, HttpClient, ReqwestClient};
use tracing::info;

pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use mapsync_install::{InstallEvent, InstallOutcome, Installer, InstallerConfig, ReleaseSet};
pub use mapsync_sync::{FileStatus, Manifest, MapSource, Reconciler, SyncReport};
pub use mapsync_verify::Digest;

mod config;
mod error;

/// Build the production fetcher, honouring the configured user agent.
pub fn fetcher(config: &Config) -> Result<Fetcher<ReqwestClient>> {
    let client = match &config.user_agent {
        Some(user_agent) => ReqwestClient::with_user_agent(user_agent)?,
        None => ReqwestClient::new()?,
    };
    Ok(Fetcher::new(client))
}

/// Map folder of a game installation, `<root>/CoJ2/Data/MapsNet`.
///
/// `CoJ2` and `Data` must already exist; `MapsNet` is created by the first
/// download.
pub fn maps_dir(game_root: &Path) -> Result<PathBuf> {
    if !game_root.is_dir() {
        return Err(Error::MissingGameDir {
            folder: "game",
            root:   game_root.to_path_buf(),
        });
    }
    let mut dir = game_root.to_path_buf();
    for folder in ["CoJ2", "Data"] {
        dir.push(folder);
        if !dir.is_dir() {
            return Err(Error::MissingGameDir {
                folder,
                root: game_root.to_path_buf(),
            });
        }
    }
    dir.push("MapsNet");
    Ok(dir)
}

/// Fetch the manifest of `source` and reconcile `target_dir` against it.
///
/// `on_status` receives the manifest index, the file name, and the new status.
pub async fn sync_manifest<C, F>(
    config: &Config,
    fetcher: &Fetcher<C>,
    target_dir: &Path,
    source: &MapSource,
    allow_download: bool,
    on_status: F,
) -> Result<SyncReport>
where
    C: HttpClient,
    F: Fn(usize, &str, FileStatus) + Sync,
{
    let manifest = Manifest::fetch(fetcher, &source.manifest_url).await?;
    info!(source = %source.name, files = manifest.len(), "manifest fetched");
    let names: Vec<&str> = manifest.names().collect();

    let report = Reconciler::for_source(fetcher, source)
        .with_concurrency(config.concurrency)
        .sync_manifest(target_dir, &manifest, allow_download, |index, status| {
            on_status(index, names[index], status)
        })
        .await?;
    Ok(report)
}

/// Restore the files listed by `source` from backup slots only.
pub async fn revert_manifest<C, F>(
    config: &Config,
    fetcher: &Fetcher<C>,
    target_dir: &Path,
    source: &MapSource,
    on_status: F,
) -> Result<SyncReport>
where
    C: HttpClient,
    F: Fn(usize, &str, FileStatus) + Sync,
{
    let manifest = Manifest::fetch(fetcher, &source.manifest_url).await?;
    let names: Vec<&str> = manifest.names().collect();

    let report = Reconciler::for_source(fetcher, source)
        .with_concurrency(config.concurrency)
        .revert_manifest(target_dir, &manifest, |index, status| on_status(index, names[index], status))
        .await?;
    Ok(report)
}

/// Bring the game root to the preferred release of the configured installer.
pub async fn install_patch<C: HttpClient>(
    config: &Config,
    fetcher: &Fetcher<C>,
    target_dir: &Path,
    extra_entries: &[String],
    on_log: impl Fn(&InstallEvent),
) -> Result<InstallOutcome> {
    let installer = config.installer.as_ref().ok_or(Error::NoInstaller)?;
    let outcome = Installer::new(fetcher, installer)
        .install_patch(target_dir, extra_entries, on_log)
        .await?;
    Ok(outcome)
}
