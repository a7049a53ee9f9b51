use std::path::PathBuf;

use thiserror::Error;

use crate::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{folder} folder is missing under '{root}'")]
    MissingGameDir { folder: &'static str, root: PathBuf },

    #[error("no installer configured")]
    NoInstaller,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] mapsync_fetch::FetchError),

    #[error(transparent)]
    Sync(#[from] mapsync_sync::SyncError),

    #[error(transparent)]
    Install(#[from] mapsync_install::InstallError),
}

pub type Result<T> = std::result::Result<T, Error>;
