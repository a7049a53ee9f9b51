use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("failed to hash '{path}': {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid digest '{0}': expected 64 hex characters")]
    InvalidDigest(String),

    #[error("invalid digest length: expected 32 bytes, got {0}")]
    InvalidLength(usize),

    #[error("hashing task failed: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, VerifyError>;
