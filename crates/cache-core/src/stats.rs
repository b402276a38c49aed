//! Persisted per-cache statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters kept for one cache instance
///
/// Counters only grow within a session; `clear` is the one thing that
/// resets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub total_hits: u64,
    pub total_misses: u64,
    pub total_saves: u64,
    pub last_cleanup_at: DateTime<Utc>,
}

impl CacheMetadata {
    /// Zeroed counters, stamped with `now` as the last cleanup
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_hits: 0,
            total_misses: 0,
            total_saves: 0,
            last_cleanup_at: now,
        }
    }

    pub fn record_hit(&mut self) {
        self.total_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.total_misses += 1;
    }

    pub fn record_save(&mut self) {
        self.total_saves += 1;
    }

    /// Hits over lookups, 0.0 before the first lookup
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_hits + self.total_misses;
        if total == 0 {
            0.0
        } else {
            self.total_hits as f64 / total as f64
        }
    }
}
