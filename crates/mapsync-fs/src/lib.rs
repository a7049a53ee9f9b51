//! Filesystem primitives for verified file replacement.
//!
//! # Key Features
//!
//! - **Never delete**: displaced files rotate into `.bak`, `.bak1`, ... slots
//! - **Three-rename swap**: a matching backup replaces the live file with no
//!   window in which neither copy exists
//! - **Staged writes**: new content lands beside the target and is renamed over it

pub use self::backup::{
    backup_slots, displace, find_matching_backup_and_swap, next_backup_slot, swap_into_place,
};
pub use self::error::{FsError, Result};
pub use self::name::validate_file_name;
pub use self::write::{is_staging_name, replace_with_buffer, write_buffer};

mod backup;
mod error;
mod name;
mod write;

/// Whether anything currently exists at `path`.
pub async fn exists(path: &std::path::Path) -> bool { backup::occupied(path).await }
