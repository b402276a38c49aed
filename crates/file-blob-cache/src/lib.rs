//! File-based blob cache with size-based LRU eviction
//!
//! Remote resources are downloaded on first use into a directory, one file
//! per URL named by the URL's hash. The directory is the only index; file
//! modification times serve as the recency signal. When the directory grows
//! past its budget the oldest files are removed down to a low-water mark.
//! Failed or timed-out downloads never surface as errors: the caller gets
//! the original URL back.

mod cache;
mod config;
mod download;
mod error;
mod types;

pub use cache::BlobCache;
pub use config::BlobCacheConfig;
pub use download::{Downloader, HttpDownloader};
pub use error::{DownloadError, Result};
pub use types::{BlobCacheStats, BlobRef};
