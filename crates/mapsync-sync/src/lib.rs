//! Manifest-driven reconciliation of a directory against expected digests.
//!
//! For every `(file, digest)` pair the [`Reconciler`] decides between skipping,
//! swapping a matching backup into place, or displacing the stale file and
//! downloading a verified replacement. A batch runs its files concurrently
//! behind an [`AdmissionGate`] and reports each transition by manifest index.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use mapsync_fetch::{Fetcher, ReqwestClient};
//! use mapsync_sync::{Manifest, Reconciler};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::new(ReqwestClient::new()?);
//! let manifest = Manifest::fetch(&fetcher, "https://example.org/manifest.json").await?;
//! let report = Reconciler::new(&fetcher, "https://example.org/MapsNet/")
//!     .sync_manifest(Path::new("MapsNet"), &manifest, true, |index, status| {
//!         println!("{index}: {status}");
//!     })
//!     .await?;
//! assert!(report.all_ok());
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod gate;
mod manifest;
mod source;
mod status;

pub use engine::{Mode, Reconciler, SyncReport};
pub use error::{Result, SyncError};
pub use gate::{Admission, AdmissionGate, DEFAULT_CONCURRENCY};
pub use manifest::{Manifest, ManifestEntry};
pub use source::MapSource;
pub use status::FileStatus;
