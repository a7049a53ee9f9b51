use crate::{CurrentFileDigests, ReleaseSet};

/// How the files on disk relate to one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchState {
    /// Every file matches.
    Applied,
    /// At least one file is absent. Listed in release order.
    Absent { missing: Vec<String> },
    /// All files present, these ones with other content.
    Mixed { mismatched: Vec<String> },
}

/// Classifies the current state of a directory against a [`ReleaseSet`].
pub struct StateMatcher<'a> {
    release: &'a ReleaseSet,
}

impl<'a> StateMatcher<'a> {
    pub fn new(release: &'a ReleaseSet) -> Self { Self { release } }

    pub fn classify(&self, current: &CurrentFileDigests) -> MatchState {
        let mut missing = Vec::new();
        let mut mismatched = Vec::new();
        for entry in &self.release.files {
            if current.matches(&entry.name, &entry.digest) {
                continue;
            }
            if current.is_present(&entry.name) {
                mismatched.push(entry.name.clone());
            } else {
                missing.push(entry.name.clone());
            }
        }

        if !missing.is_empty() {
            MatchState::Absent { missing }
        } else if !mismatched.is_empty() {
            MatchState::Mixed { mismatched }
        } else {
            MatchState::Applied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsync_sync::Manifest;
    use mapsync_verify::Digest;
    use tempfile::tempdir;

    fn release() -> ReleaseSet {
        ReleaseSet::new(
            "r1",
            Manifest::from_entries([("a.dll", Digest::of(b"a")), ("b.dll", Digest::of(b"b"))]).unwrap(),
        )
    }

    async fn scan(files: &[(&str, &[u8])]) -> CurrentFileDigests {
        let dir = tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        CurrentFileDigests::scan(dir.path(), ["a.dll", "b.dll"]).await.unwrap()
    }

    #[tokio::test]
    async fn test_applied() {
        let current = scan(&[("a.dll", b"a"), ("b.dll", b"b")]).await;
        assert_eq!(StateMatcher::new(&release()).classify(&current), MatchState::Applied);
    }

    #[tokio::test]
    async fn test_mixed() {
        let current = scan(&[("a.dll", b"a"), ("b.dll", b"other")]).await;
        assert_eq!(
            StateMatcher::new(&release()).classify(&current),
            MatchState::Mixed {
                mismatched: vec!["b.dll".into()]
            }
        );
    }

    #[tokio::test]
    async fn test_absent_wins_over_mismatch() {
        let current = scan(&[("a.dll", b"other")]).await;
        assert_eq!(
            StateMatcher::new(&release()).classify(&current),
            MatchState::Absent {
                missing: vec!["b.dll".into()]
            }
        );
    }
}
