//! Blob cache settings

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one blob cache directory
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlobCacheConfig {
    pub cache_dir: PathBuf,
    /// Total bytes above which eviction runs
    pub max_size: u64,
    /// Eviction stops once the total is at or below `max_size * low_water_ratio`
    pub low_water_ratio: f64,
    pub download_timeout_secs: u64,
    /// Extension used when a URL carries none
    pub default_extension: String,
}

impl BlobCacheConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn low_water_mark(&self) -> u64 {
        (self.max_size as f64 * self.low_water_ratio) as u64
    }
}

impl Default for BlobCacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./cache/videos"),
            max_size: 100 * 1024 * 1024, // 100 MB
            low_water_ratio: 0.8,
            download_timeout_secs: 60,
            default_extension: "mp4".to_string(),
        }
    }
}
