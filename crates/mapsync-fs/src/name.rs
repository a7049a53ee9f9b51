use std::path::{Component, Path};

use crate::write::is_staging_name;
use crate::{FsError, Result};

/// Accept only names that resolve to exactly one normal component.
///
/// Manifest and release entries are joined onto a target directory, so anything
/// that could climb out of it (`..`, separators, absolute or prefixed paths) is
/// rejected up front, as is anything shaped like a staging file.
pub fn validate_file_name(name: &str) -> Result<&str> {
    let invalid = || FsError::InvalidName(name.to_string());

    if name.is_empty() || name.contains(['/', '\\', '\0']) || is_staging_name(name) {
        return Err(invalid());
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(invalid()),
    }
}
