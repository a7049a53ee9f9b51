//! Apply a known release of a set of files from a ZIP archive, with every
//! replaced file kept as a backup.
//!
//! A release catalog names known-good states (tag → file digests). The
//! [`Installer`] hashes what is on disk, then either reports the preferred
//! release as applied, restores it from backup slots, or downloads the release
//! archive and writes each verified member.

mod digests;
mod error;
mod event;
mod installer;
mod matcher;
mod release;
mod splice;

pub use digests::CurrentFileDigests;
pub use error::{InstallError, Result};
pub use event::InstallEvent;
pub use installer::{InstallOutcome, Installer, InstallerConfig, Reversion};
pub use matcher::{MatchState, StateMatcher};
pub use release::{ReleaseAsset, ReleaseDescriptor, ReleaseSet};
pub use splice::splice_entries;
