//! Error types for mapsync-install.

use mapsync_verify::Digest;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("release catalog is empty")]
    EmptyCatalog,

    #[error("release '{0}' is not in the catalog")]
    UnknownTag(String),

    #[error("archive member '{file}' has digest {actual}, expected {expected}")]
    DigestMismatch {
        file:     String,
        expected: Digest,
        actual:   Digest,
    },

    #[error(transparent)]
    Fetch(#[from] mapsync_fetch::FetchError),

    #[error(transparent)]
    Archive(#[from] mapsync_archive::ArchiveError),

    #[error(transparent)]
    Fs(#[from] mapsync_fs::FsError),

    #[error(transparent)]
    Verify(#[from] mapsync_verify::VerifyError),
}

pub type Result<T> = std::result::Result<T, InstallError>;
