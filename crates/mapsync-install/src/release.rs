use mapsync_sync::Manifest;
use serde::{Deserialize, Serialize};

/// A named known-good state: the exact digest of every file it consists of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSet {
    pub tag:   String,
    pub files: Manifest,
}

impl ReleaseSet {
    pub fn new(tag: impl Into<String>, files: Manifest) -> Self {
        Self {
            tag: tag.into(),
            files,
        }
    }
}

/// The part of a releases API response the installer reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseDescriptor {
    pub tag_name: String,
    #[serde(default)]
    pub assets:   Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub name:                 String,
    pub content_type:         String,
    pub browser_download_url: String,
}

impl ReleaseDescriptor {
    /// First asset whose content type is one of `accepted`.
    pub fn find_asset<S: AsRef<str>>(&self, accepted: &[S]) -> Option<&ReleaseAsset> {
        self.assets
            .iter()
            .find(|asset| accepted.iter().any(|t| t.as_ref() == asset.content_type))
    }
}
