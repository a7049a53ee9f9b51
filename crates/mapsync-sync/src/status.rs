use std::fmt;

use serde::Serialize;

/// Per-file progress reported to the caller while a batch runs.
///
/// Not persisted: a status exists only for the duration of one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    Checking,
    Downloading,
    Writing,
    Ok,
    /// Present with the wrong digest and not allowed to fix it.
    Mismatch,
    /// The downloaded body did not hash to the expected digest; nothing written.
    DownloadMismatch,
    Missing,
    /// No backup slot held the expected content.
    RevertFailed,
}

impl FileStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Ok | Self::Mismatch | Self::DownloadMismatch | Self::Missing | Self::RevertFailed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Checking => "checking",
            Self::Downloading => "downloading",
            Self::Writing => "writing",
            Self::Ok => "ok",
            Self::Mismatch => "mismatch",
            Self::DownloadMismatch => "download mismatch",
            Self::Missing => "missing",
            Self::RevertFailed => "revert failed",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
