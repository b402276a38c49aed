//! Shared building blocks for the content caches
//!
//! Deterministic key hashing, the TTL predicate, the persisted statistics
//! record, eviction planning and an injectable clock. Nothing here performs
//! I/O; the summary and blob caches layer storage on top.

pub mod clock;
pub mod eviction;
pub mod expiry;
pub mod key;
pub mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use eviction::{lru_victims, size_victims, FileUsage};
pub use expiry::{expiry_from, is_expired, ttl_from_secs, DEFAULT_TTL_SECS};
pub use key::{blob_file_name, content_fingerprint, url_extension, url_hash};
pub use stats::CacheMetadata;
