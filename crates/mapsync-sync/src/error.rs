use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid file name '{0}': must be a single plain path component")]
    InvalidName(String),

    #[error("file '{0}' is listed more than once")]
    DuplicateName(String),

    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("admission gate closed")]
    GateClosed,

    #[error(transparent)]
    Fetch(#[from] mapsync_fetch::FetchError),

    #[error(transparent)]
    Fs(#[from] mapsync_fs::FsError),

    #[error(transparent)]
    Verify(#[from] mapsync_verify::VerifyError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
