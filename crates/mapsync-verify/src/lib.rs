//! SHA-256 digests and streaming hashing for synchronized files.
//!
//! Every comparison the engine makes goes through [`Digest`]: files on disk are
//! hashed in fixed-size chunks off the async scheduler, and downloads are hashed
//! while they are buffered so integrity is known without a second read.
//!
//! # Example
//!
//! ```
//! use mapsync_verify::{Digest, Hasher, Sha256Hasher};
//!
//! let mut hasher = Sha256Hasher::new();
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//!
//! assert_eq!(hasher.finish(), Digest::of(b"hello world"));
//! ```

pub use self::digest::Digest;
pub use self::error::{Result, VerifyError};
pub use self::file::{CHUNK_SIZE, hash_file, hash_file_blocking, hash_reader};
pub use self::hasher::{Hasher, Sha256Hasher};
pub use self::stream::hash_and_buffer;

mod digest;
mod error;
mod file;
mod hasher;
mod stream;
