use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::{Digest, Hasher, Result, Sha256Hasher, VerifyError};

/// Read size used for every chunked pass over file content.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Fold everything `reader` yields into `hasher`, [`CHUNK_SIZE`] bytes at a time.
pub fn hash_reader<R: Read, H: Hasher>(mut reader: R, mut hasher: H) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

/// Synchronous file hashing. Prefer [`hash_file`] from async code.
pub fn hash_file_blocking(path: &Path) -> Result<Digest> {
    let io_err = |source| VerifyError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let bytes = hash_reader(file, Sha256Hasher::new()).map_err(io_err)?;
    Digest::try_from(bytes.as_slice())
}

/// Hash a file on the blocking pool so large files never stall other tasks.
pub async fn hash_file(path: impl AsRef<Path>) -> Result<Digest> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || hash_file_blocking(&path))
        .await
        .map_err(|e| VerifyError::Join(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_hash_reader_spans_chunks() {
        let data = vec![0xA5u8; CHUNK_SIZE * 2 + 17];
        let hash = hash_reader(&data[..], Sha256Hasher::new()).unwrap();
        assert_eq!(hash, Digest::of(&data).as_bytes().to_vec());
    }

    #[tokio::test]
    async fn test_hash_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.map");
        std::fs::write(&path, b"hello world").unwrap();

        assert_eq!(hash_file(&path).await.unwrap(), Digest::of(b"hello world"));
    }

    #[tokio::test]
    async fn test_hash_file_missing() {
        let dir = tempdir().unwrap();
        let result = hash_file(dir.path().join("absent")).await;
        match result {
            Err(VerifyError::Io { path, source }) => {
                assert!(path.ends_with("absent"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
