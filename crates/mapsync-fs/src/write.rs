use std::path::{Path, PathBuf};

use mapsync_verify::CHUNK_SIZE;
use tokio::io::AsyncWriteExt;

use crate::backup::rename;
use crate::error::io_error;
use crate::{FsError, Result};

/// Write `data` to `path` in [`CHUNK_SIZE`] pieces, truncating any old content.
///
/// The handle is scoped to this call and synced before returning.
pub async fn write_buffer(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(io_error("open", path))?;

    for chunk in data.chunks(CHUNK_SIZE) {
        file.write_all(chunk).await.map_err(io_error("write", path))?;
    }
    file.flush().await.map_err(io_error("write", path))?;
    file.sync_all().await.map_err(io_error("sync", path))?;
    Ok(())
}

const STAGING_PREFIX: &str = ".";
const STAGING_SUFFIX: &str = ".tmp";

fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FsError::InvalidName(path.display().to_string()))?;
    Ok(path.with_file_name(format!("{STAGING_PREFIX}{name}{STAGING_SUFFIX}")))
}

/// Whether `name` has the shape of a staging file written by
/// [`replace_with_buffer`].
pub fn is_staging_name(name: &str) -> bool {
    name.len() > STAGING_PREFIX.len() + STAGING_SUFFIX.len()
        && name.starts_with(STAGING_PREFIX)
        && name.ends_with(STAGING_SUFFIX)
}

/// Write `data` beside `path`, then rename it over `path`.
///
/// Readers of `path` see either the old content or all of `data`. The staging
/// file is removed if either step fails.
pub async fn replace_with_buffer(path: &Path, data: &[u8]) -> Result<()> {
    let staging = staging_path(path)?;

    let result = match write_buffer(&staging, data).await {
        Ok(()) => rename(&staging, path).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(&staging).await;
    }
    result
}
