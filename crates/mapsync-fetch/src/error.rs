//! Error types for mapsync-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url:    String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error(transparent)]
    Fs(#[from] mapsync_fs::FsError),
}

impl FetchError {
    pub(crate) fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            url:     url.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
