use std::fmt;

/// User-facing progress of an install, rendered as one log line each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    AlreadyApplied,
    Missing { file: String },
    Reverted { tag: String },
    RevertFailed { tag: String, files: Vec<String> },
    CheckingRelease,
    UpdateAvailable { latest: String },
    ResolvingAsset,
    NoAsset,
    Downloading,
    HashMismatch { file: String },
    Patched { tag: String },
    /// A transport failure, verbatim.
    Error(String),
}

impl fmt::Display for InstallEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyApplied => f.write_str("already patched!"),
            Self::Missing { file } => write!(f, "{file} missing!"),
            Self::Reverted { tag } => write!(f, "reverted to {tag}!"),
            Self::RevertFailed { tag, files } => write!(f, "failed to revert to {tag}: {}!", files.join(", ")),
            Self::CheckingRelease => f.write_str("checking latest release.."),
            Self::UpdateAvailable { latest } => write!(f, "newer release available: {latest}!"),
            Self::ResolvingAsset => f.write_str("getting release download url.."),
            Self::NoAsset => f.write_str("no zip found!"),
            Self::Downloading => f.write_str("downloading release archive.."),
            Self::HashMismatch { file } => write!(f, "{file} hash mismatch!"),
            Self::Patched { tag } => write!(f, "patched to {tag}!"),
            Self::Error(message) => f.write_str(message),
        }
    }
}
