use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive is corrupted: {0}")]
    Corrupted(String),

    #[error("archive has no member named '{0}'")]
    MissingMember(String),

    #[error("failed to read member '{name}': {source}")]
    Read {
        name:   String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
