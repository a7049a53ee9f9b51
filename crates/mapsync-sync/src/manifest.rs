use std::collections::HashSet;
use std::fmt;

use mapsync_fetch::{Fetcher, HttpClient};
use mapsync_verify::Digest;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Result, SyncError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name:   String,
    pub digest: Digest,
}

/// Ordered file name → expected digest mapping.
///
/// Order is kept as received so callers can address rows by index. Names are
/// validated to be single path components and unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self { Self::default() }

    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Digest)>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut manifest = Self::new();
        for (name, digest) in entries {
            let name = name.into();
            if mapsync_fs::validate_file_name(&name).is_err() {
                return Err(SyncError::InvalidName(name));
            }
            if !seen.insert(name.clone()) {
                return Err(SyncError::DuplicateName(name));
            }
            manifest.entries.push(ManifestEntry { name, digest });
        }
        Ok(manifest)
    }

    /// Parse the `{ "<file>": "<hex digest>", ... }` wire form.
    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> { serde_json::from_slice(data) }

    /// Download and parse a manifest.
    pub async fn fetch<C: HttpClient>(fetcher: &Fetcher<C>, url: &str) -> Result<Self> {
        Ok(fetcher.fetch_json(url).await?)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> { self.entries.iter() }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.entries.iter().map(|e| e.name.as_str()) }

    pub fn get(&self, name: &str) -> Option<&Digest> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.digest)
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter { self.entries.iter() }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.digest)?;
        }
        map.end()
    }
}

struct ManifestVisitor;

impl<'de> Visitor<'de> for ManifestVisitor {
    type Value = Manifest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of file names to hex SHA-256 digests")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Manifest, A::Error> {
        let mut entries: Vec<(String, Digest)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry()? {
            entries.push(entry);
        }
        Manifest::from_entries(entries).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(ManifestVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_order_is_preserved() {
        let json = format!(
            r#"{{"z.map": "{}", "a.map": "{}", "m.map": "{}"}}"#,
            Digest::of(b"z"),
            Digest::of(b"a"),
            Digest::of(b"m")
        );
        let manifest = Manifest::from_json(json.as_bytes()).unwrap();

        assert_eq!(manifest.names().collect::<Vec<_>>(), vec!["z.map", "a.map", "m.map"]);
        assert_eq!(manifest.get("a.map"), Some(&Digest::of(b"a")));
        assert_eq!(manifest.get("b.map"), None);
    }

    #[test]
    fn test_json_rejects_bad_digest_and_traversal() {
        assert!(Manifest::from_json(br#"{"a.map": "xyz"}"#).is_err());
        let json = format!(r#"{{"../evil.dll": "{}"}}"#, Digest::of(b"x"));
        assert!(Manifest::from_json(json.as_bytes()).is_err());
        assert!(Manifest::from_json(b"[]").is_err());
    }

    #[test]
    fn test_staging_shaped_name_rejected() {
        let err = Manifest::from_entries([("a.map", Digest::of(b"a")), (".a.map.tmp", Digest::of(b"x"))])
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidName(name) if name == ".a.map.tmp"));
    }

    #[test]
    fn test_duplicates_rejected() {
        let err = Manifest::from_entries([("a.map", Digest::of(b"1")), ("a.map", Digest::of(b"2"))])
            .unwrap_err();
        assert!(matches!(err, SyncError::DuplicateName(name) if name == "a.map"));
    }

    #[test]
    fn test_serialize_matches_wire_form() {
        let manifest = Manifest::from_entries([("b.map", Digest::of(b"b")), ("a.map", Digest::of(b"a"))])
            .unwrap();
        let json = serde_json::to_string(&manifest).unwrap();
        assert_eq!(
            json,
            format!(r#"{{"b.map":"{}","a.map":"{}"}}"#, Digest::of(b"b"), Digest::of(b"a"))
        );
        assert_eq!(Manifest::from_json(json.as_bytes()).unwrap(), manifest);
    }
}
