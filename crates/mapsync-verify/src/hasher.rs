use sha2::Digest as _;

use crate::Digest;

/// Incremental hash state.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

pub struct Sha256Hasher(sha2::Sha256);

impl Hasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

impl Default for Sha256Hasher {
    fn default() -> Self { Self::new() }
}

impl Sha256Hasher {
    pub fn new() -> Self { Self(sha2::Sha256::new()) }

    /// Finalize straight into a [`Digest`].
    pub fn finish(self) -> Digest { Digest::from_bytes(self.0.finalize().into()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hasher() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        let hash = hasher.finalize();

        let expected =
            hex::decode("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
                .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_finish_matches_finalize() {
        let mut a = Sha256Hasher::new();
        let mut b = Sha256Hasher::new();
        a.update(b"map data");
        b.update(b"map data");
        assert_eq!(a.finish().as_bytes().to_vec(), b.finalize());
    }
}
