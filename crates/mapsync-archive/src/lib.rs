//! Read members of a downloaded ZIP archive by exact name.
//!
//! Release archives are small and already held in memory after download, so
//! nothing is extracted to disk here. Callers verify each member's digest before
//! deciding where its bytes go.

use std::io::{Cursor, Read};

use bytes::Bytes;
use zip::result::ZipError;

pub use error::{ArchiveError, Result};

mod error;

/// Upper bound on the buffer reserved from a member's declared size.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

fn initial_capacity(declared: u64) -> usize { declared.min(MAX_PREALLOC) as usize }

pub struct Archive {
    inner: zip::ZipArchive<Cursor<Bytes>>,
}

impl Archive {
    pub fn open(data: impl Into<Bytes>) -> Result<Self> {
        let inner = zip::ZipArchive::new(Cursor::new(data.into()))
            .map_err(|e| ArchiveError::Corrupted(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.inner.len() == 0 }

    pub fn names(&self) -> Vec<String> { self.inner.file_names().map(str::to_string).collect() }

    pub fn contains(&self, name: &str) -> bool { self.inner.index_for_name(name).is_some() }

    /// Whole content of the member stored under exactly `name`.
    pub fn read_member(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut member = self.inner.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => ArchiveError::MissingMember(name.to_string()),
            other => ArchiveError::Corrupted(other.to_string()),
        })?;
        let mut content = Vec::with_capacity(initial_capacity(member.size()));
        member
            .read_to_end(&mut content)
            .map_err(|source| ArchiveError::Read {
                name: name.to_string(),
                source,
            })?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in members {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_declared_size_only_bounds_reservation() {
        assert_eq!(initial_capacity(9), 9);
        assert_eq!(initial_capacity(MAX_PREALLOC), MAX_PREALLOC as usize);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOC as usize);
    }

    #[test]
    fn test_read_member_by_exact_name() {
        let data = build(&[("serverlist.dll", b"dll bytes"), ("serverlist.toml", b"servers = []")]);
        let mut archive = Archive::open(data).unwrap();

        assert_eq!(archive.len(), 2);
        assert!(archive.contains("serverlist.toml"));
        assert!(!archive.contains("SERVERLIST.TOML"));
        assert_eq!(archive.read_member("serverlist.dll").unwrap(), b"dll bytes");
        assert_eq!(archive.read_member("serverlist.toml").unwrap(), b"servers = []");
    }

    #[test]
    fn test_missing_member() {
        let data = build(&[("a.dll", b"a")]);
        let mut archive = Archive::open(data).unwrap();

        assert!(matches!(
            archive.read_member("b.dll"),
            Err(ArchiveError::MissingMember(name)) if name == "b.dll"
        ));
    }

    #[test]
    fn test_garbage_is_corrupted() {
        assert!(matches!(
            Archive::open(&b"definitely not a zip"[..]),
            Err(ArchiveError::Corrupted(_))
        ));
    }
}
