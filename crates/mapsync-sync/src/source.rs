use serde::{Deserialize, Serialize};

/// A remote repository of files: where its manifest lives and the prefix file
/// names are appended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSource {
    pub name:         String,
    pub manifest_url: String,
    pub base_url:     String,
}

impl MapSource {
    pub fn file_url(&self, file_name: &str) -> String { format!("{}{}", self.base_url, file_name) }
}
