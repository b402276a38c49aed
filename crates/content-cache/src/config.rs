//! Cache service configuration

use crate::error::Result;
use file_blob_cache::BlobCacheConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use summary_cache::SummaryCacheConfig;

/// Configuration for both caches
///
/// Every field has a default, so a JSON document only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the persistent summary namespace
    pub data_dir: PathBuf,
    pub summaries: SummaryCacheConfig,
    pub videos: BlobCacheConfig,
    /// Period of the background summary cleanup
    pub cleanup_interval_secs: u64,
}

impl CacheConfig {
    /// Read a JSON configuration document
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Period of the background summary cleanup, at least one second
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }

    /// File backing the summary namespace
    pub fn summary_store_path(&self) -> PathBuf {
        self.data_dir.join("summaries.json")
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./cache"),
            summaries: SummaryCacheConfig::default(),
            videos: BlobCacheConfig::default(),
            cleanup_interval_secs: 60 * 60, // hourly
        }
    }
}
