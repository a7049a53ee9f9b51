//! Backup slots: `<file>.bak`, `<file>.bak1`, `<file>.bak2`, ...
//!
//! A file that fails verification is never deleted. It is renamed into the next
//! free slot, and later runs may swap any slot holding the wanted bytes back
//! into place.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use mapsync_verify::{Digest, hash_file};
use tracing::debug;

use crate::error::io_error;
use crate::{FsError, Result};

const BAK: &str = ".bak";
const SWAP_SUFFIX: &str = ".ren";

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| FsError::InvalidName(path.display().to_string()))
}

fn sibling(path: &Path, name: String) -> PathBuf { path.with_file_name(name) }

/// Whether anything (file, directory, dangling symlink) occupies `path`.
pub(crate) async fn occupied(path: &Path) -> bool {
    tokio::fs::symlink_metadata(path).await.is_ok()
}

/// Slot number encoded in a directory entry name, if it belongs to `name`.
///
/// The bare `.bak` slot is number 0.
fn slot_number(entry: &str, name: &str) -> Option<u64> {
    let suffix = entry.strip_prefix(name)?.strip_prefix(BAK)?;
    if suffix.is_empty() {
        Some(0)
    } else if suffix.bytes().all(|b| b.is_ascii_digit()) {
        suffix.parse().ok()
    } else {
        None
    }
}

/// First unused sibling of `path` named `stem`, `stem1`, `stem2`, ...
async fn first_free(path: &Path, stem: &str) -> PathBuf {
    let base = sibling(path, stem.to_string());
    if !occupied(&base).await {
        return base;
    }
    let mut n: u64 = 1;
    loop {
        let candidate = sibling(path, format!("{stem}{n}"));
        if !occupied(&candidate).await {
            return candidate;
        }
        n += 1;
    }
}

/// First unused slot for `path`. Creates nothing.
pub async fn next_backup_slot(path: &Path) -> Result<PathBuf> {
    let name = file_name(path)?;
    Ok(first_free(path, &format!("{name}{BAK}")).await)
}

/// Every existing backup slot of `path`, ordered by slot number.
pub async fn backup_slots(path: &Path) -> Result<Vec<PathBuf>> {
    let name = file_name(path)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error("list", dir)(e)),
    };

    let mut slots = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_error("list", dir))? {
        let entry_name = entry.file_name();
        let Some(number) = entry_name.to_str().and_then(|s| slot_number(s, name)) else {
            continue;
        };
        let is_file = entry
            .file_type()
            .await
            .map_err(io_error("stat", entry.path()))?
            .is_file();
        if is_file {
            slots.push((number, entry.path()));
        }
    }
    slots.sort();
    Ok(slots.into_iter().map(|(_, p)| p).collect())
}

pub(crate) async fn rename(from: &Path, to: &Path) -> Result<()> {
    tokio::fs::rename(from, to).await.map_err(|source| FsError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    debug!(from = %from.display(), to = %to.display(), "renamed");
    Ok(())
}

/// Move the live file into a fresh backup slot and return that slot.
pub async fn displace(path: &Path) -> Result<PathBuf> {
    let slot = next_backup_slot(path).await?;
    rename(path, &slot).await?;
    Ok(slot)
}

/// Put the content of `slot` at `path`, keeping whatever was at `path` as `slot`.
///
/// The live file first moves to a temporary name so the only moment `path` is
/// absent lies between two renames in the same directory. The temporary name
/// is never one that already exists, so leftovers of an interrupted swap
/// survive.
pub async fn swap_into_place(path: &Path, slot: &Path) -> Result<()> {
    if !occupied(path).await {
        return rename(slot, path).await;
    }
    let slot_name = file_name(slot)?;
    let parked = first_free(slot, &format!("{slot_name}{SWAP_SUFFIX}")).await;
    rename(path, &parked).await?;
    rename(slot, path).await?;
    rename(&parked, slot).await
}

/// Scan the backups of `path` for one whose digest is `expected` and swap it in.
///
/// Returns `false`, leaving everything untouched, when no slot matches.
pub async fn find_matching_backup_and_swap(path: &Path, expected: &Digest) -> Result<bool> {
    for slot in backup_slots(path).await? {
        if hash_file(&slot).await? != *expected {
            continue;
        }
        swap_into_place(path, &slot).await?;
        debug!(path = %path.display(), slot = %slot.display(), "restored from backup");
        return Ok(true);
    }
    Ok(false)
}
