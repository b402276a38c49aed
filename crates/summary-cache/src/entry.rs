//! Cached summary entries and their stored form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version written into every stored entry
pub const ENTRY_SCHEMA_VERSION: u32 = 1;

/// One cached derived artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    pub content_fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub hit_count: u64,
}

/// On-disk layout of a [`CacheEntry`]
#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    #[serde(rename = "v")]
    version: u32,
    key: String,
    value: String,
    fingerprint: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
    hit_count: u64,
}

/// Why a stored entry could not be read back
#[derive(Debug)]
pub enum EntryDecodeError {
    Malformed(serde_json::Error),
    UnsupportedVersion(u32),
}

impl fmt::Display for EntryDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryDecodeError::Malformed(err) => write!(f, "Malformed entry: {}", err),
            EntryDecodeError::UnsupportedVersion(v) => {
                write!(f, "Unsupported entry version: {}", v)
            }
        }
    }
}

impl std::error::Error for EntryDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EntryDecodeError::Malformed(err) => Some(err),
            EntryDecodeError::UnsupportedVersion(_) => None,
        }
    }
}

impl CacheEntry {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&EntryRecord {
            version: ENTRY_SCHEMA_VERSION,
            key: self.key.clone(),
            value: self.value.clone(),
            fingerprint: self.content_fingerprint.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
            last_accessed_at: self.last_accessed_at,
            hit_count: self.hit_count,
        })
    }

    pub fn decode(raw: &str) -> Result<Self, EntryDecodeError> {
        let record: EntryRecord =
            serde_json::from_str(raw).map_err(EntryDecodeError::Malformed)?;
        if record.version != ENTRY_SCHEMA_VERSION {
            return Err(EntryDecodeError::UnsupportedVersion(record.version));
        }
        Ok(Self {
            key: record.key,
            value: record.value,
            content_fingerprint: record.fingerprint,
            created_at: record.created_at,
            expires_at: record.expires_at,
            last_accessed_at: record.last_accessed_at,
            hit_count: record.hit_count,
        })
    }
}

/// Why a lookup did not produce an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    NotFound,
    Expired,
    FingerprintMismatch,
    Corrupt,
    StorageFailure,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissReason::NotFound => "not_found",
            MissReason::Expired => "expired",
            MissReason::FingerprintMismatch => "fingerprint_mismatch",
            MissReason::Corrupt => "corrupt",
            MissReason::StorageFailure => "storage_failure",
        };
        f.write_str(s)
    }
}
