//! Summary cache settings

use cache_core::DEFAULT_TTL_SECS;
use serde::Deserialize;

/// Settings for one summary cache instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SummaryCacheConfig {
    /// Entry count at which a write first evicts
    pub capacity: usize,
    /// Share of entries dropped per eviction (at least one)
    pub eviction_fraction: f64,
    /// Lifetime of an entry written without an explicit expiry
    pub default_ttl_secs: u64,
    /// Prefix separating entries from the statistics record
    pub key_prefix: String,
}

impl Default for SummaryCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            eviction_fraction: 0.2,
            default_ttl_secs: DEFAULT_TTL_SECS, // 24 hours
            key_prefix: "summary_".to_string(),
        }
    }
}
