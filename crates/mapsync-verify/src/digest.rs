use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Digest as _;

use crate::{Result, VerifyError};

/// A SHA-256 value identifying exact byte content.
///
/// Parses from and displays as 64 hex characters, which is also its serde form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    pub const LEN: usize = 32;

    pub const fn from_bytes(bytes: [u8; 32]) -> Self { Self(bytes) }

    pub fn as_bytes(&self) -> &[u8; 32] { &self.0 }

    /// Digest of an in-memory buffer.
    pub fn of(data: &[u8]) -> Self { Self(sha2::Sha256::digest(data).into()) }

    pub fn from_hex(s: &str) -> Result<Self> { s.parse() }

    pub fn to_hex(&self) -> String { hex::encode(self.0) }
}

impl FromStr for Digest {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(trimmed, &mut bytes)
            .map_err(|_| VerifyError::InvalidDigest(trimmed.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = VerifyError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        <[u8; 32]>::try_from(bytes)
            .map(Self)
            .map_err(|_| VerifyError::InvalidLength(bytes.len()))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hex()) }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_of_matches_known_value() {
        assert_eq!(Digest::of(b"hello world").to_hex(), HELLO);
    }

    #[test]
    fn test_parse_accepts_uppercase_and_whitespace() {
        let parsed: Digest = format!("  {}\n", HELLO.to_uppercase()).parse().unwrap();
        assert_eq!(parsed, Digest::of(b"hello world"));
        assert_eq!(parsed.to_string(), HELLO);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!("abc".parse::<Digest>(), Err(VerifyError::InvalidDigest(_))));
        let not_hex = "z".repeat(64);
        assert!(not_hex.parse::<Digest>().is_err());
    }

    #[test]
    fn test_try_from_slice_length() {
        assert!(matches!(Digest::try_from(&[0u8; 31][..]), Err(VerifyError::InvalidLength(31))));
        assert_eq!(Digest::try_from(&[7u8; 32][..]).unwrap(), Digest::from_bytes([7; 32]));
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let digest = Digest::of(b"hello world");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{HELLO}\""));
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
        assert!(serde_json::from_str::<Digest>("\"nope\"").is_err());
    }
}
