//! Client-side content caches
//!
//! One [`CacheService`] per application run owns the summary cache and the
//! video cache and is passed to everything that needs them. Neither cache
//! ever fails a caller: summaries degrade to misses and videos to their
//! remote URL.

mod config;
mod error;
mod service;

pub use config::CacheConfig;
pub use error::{Result, ServiceError};
pub use service::{CacheService, GeneratedSummary, Summary, SummaryGenerator};

pub use cache_core::{content_fingerprint, CacheMetadata};
pub use file_blob_cache::{BlobCache, BlobCacheConfig, BlobCacheStats, BlobRef};
pub use summary_cache::{CacheEntry, MetadataCache, SummaryCacheConfig};
