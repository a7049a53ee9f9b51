use std::io;
use std::path::PathBuf;

use mapsync_verify::VerifyError;

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("failed to {op} '{path}': {source}")]
    Io {
        op:     &'static str,
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to rename '{from}' to '{to}': {source}")]
    Rename {
        from:   PathBuf,
        to:     PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid file name '{0}': must be a single plain path component")]
    InvalidName(String),

    #[error(transparent)]
    Verify(#[from] VerifyError),
}

pub type Result<T> = std::result::Result<T, FsError>;

pub(crate) fn io_error(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> FsError {
    let path = path.into();
    move |source| FsError::Io { op, path, source }
}
