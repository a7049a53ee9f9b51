//! TOML configuration: map sources, batch concurrency, and the release catalog.

use std::io;
use std::path::{Path, PathBuf};

use mapsync_install::InstallerConfig;
use mapsync_sync::{DEFAULT_CONCURRENCY, MapSource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN: &str = include_str!("defaults.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("no map source named '{0}'")]
    UnknownSource(String),
}

fn default_concurrency() -> usize { DEFAULT_CONCURRENCY }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Files reconciled at once per batch.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub user_agent:  Option<String>,
    #[serde(default)]
    pub sources:     Vec<MapSource>,
    #[serde(default)]
    pub installer:   Option<InstallerConfig>,
}

impl Config {
    /// The known map sources and server list mod releases.
    pub fn builtin() -> Result<Self, ConfigError> { Self::from_toml_str(BUILTIN) }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> { Ok(toml::from_str(s)?) }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn source(&self, name: &str) -> Result<&MapSource, ConfigError> {
        self.sources
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ConfigError::UnknownSource(name.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            user_agent:  None,
            sources:     Vec::new(),
            installer:   None,
        }
    }
}
