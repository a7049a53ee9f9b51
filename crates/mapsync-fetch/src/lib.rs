//! HTTP fetching with streaming digest computation.
//!
//! # Key Features
//!
//! - **Single-Pass**: bodies are hashed while they are buffered, so a download
//!   is verified without reading it twice
//! - **Client seam**: [`HttpClient`] keeps transport pluggable; [`ReqwestClient`]
//!   in production, [`mock::MockHttpClient`] in tests
//! - **Chunked writes**: [`write_buffer`] and [`replace_with_buffer`] put
//!   verified buffers on disk

mod error;
mod fetcher;
mod http;
pub mod mock;

pub use error::{FetchError, Result};
pub use fetcher::Fetcher;
pub use http::{BoxStream, HttpClient, HttpResponse};
pub use mapsync_fs::{replace_with_buffer, write_buffer};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
