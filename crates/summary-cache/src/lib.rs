//! Persistent cache for generated summaries
//!
//! Entries are validated on every read against their expiry and, when the
//! caller supplies one, the fingerprint of the content they were generated
//! from. Anything that fails validation is purged and reported as a miss.
//! Storage problems are logged and also surface as misses.

mod cache;
mod config;
mod entry;
mod error;
mod store;

pub use cache::{MetadataCache, METADATA_KEY};
pub use config::SummaryCacheConfig;
pub use entry::{CacheEntry, EntryDecodeError, MissReason, ENTRY_SCHEMA_VERSION};
pub use error::{Result, StoreError};
pub use store::{FileStore, KvStore, MemoryStore};
