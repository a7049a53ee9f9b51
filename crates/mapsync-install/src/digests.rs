use std::collections::HashMap;
use std::path::Path;

use mapsync_verify::{Digest, hash_file};
use tracing::debug;

use crate::Result;

/// Digest of each file as it currently sits on disk, `None` when absent.
///
/// Filled once per install and updated as files are swapped or written, so
/// nothing is hashed twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentFileDigests {
    digests: HashMap<String, Option<Digest>>,
}

impl CurrentFileDigests {
    /// Hash every named file under `dir`. Repeated names are hashed once.
    pub async fn scan<'a>(dir: &Path, names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut current = Self::default();
        for name in names {
            if current.digests.contains_key(name) {
                continue;
            }
            let path = dir.join(name);
            let digest = if mapsync_fs::exists(&path).await {
                Some(hash_file(&path).await?)
            } else {
                None
            };
            debug!(file = name, digest = ?digest, "scanned");
            current.digests.insert(name.to_string(), digest);
        }
        Ok(current)
    }

    /// Current digest of `name`; `None` if the file is absent or was never scanned.
    pub fn get(&self, name: &str) -> Option<Digest> { self.digests.get(name).copied().flatten() }

    pub fn is_present(&self, name: &str) -> bool { self.get(name).is_some() }

    pub fn matches(&self, name: &str, expected: &Digest) -> bool { self.get(name).as_ref() == Some(expected) }

    pub(crate) fn record(&mut self, name: &str, digest: Digest) {
        self.digests.insert(name.to_string(), Some(digest));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_scan_present_and_absent() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.dll"), b"a").unwrap();

        let current = CurrentFileDigests::scan(dir.path(), ["a.dll", "b.dll", "a.dll"]).await.unwrap();

        assert_eq!(current.get("a.dll"), Some(Digest::of(b"a")));
        assert!(current.matches("a.dll", &Digest::of(b"a")));
        assert!(!current.is_present("b.dll"));
        assert_eq!(current.get("never-scanned.dll"), None);
    }

    #[test]
    fn test_record_overrides() {
        let mut current = CurrentFileDigests::default();
        current.record("a.dll", Digest::of(b"new"));
        assert!(current.matches("a.dll", &Digest::of(b"new")));
    }
}
