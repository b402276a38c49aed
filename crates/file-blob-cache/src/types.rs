//! Cache types

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use url::Url;

const MB: f64 = 1024.0 * 1024.0;

/// Where a resolved blob can be read from
///
/// Consumers must accept either form: a failed download degrades to the
/// original remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobRef {
    Local(PathBuf),
    Remote(String),
}

impl BlobRef {
    pub fn is_local(&self) -> bool {
        matches!(self, BlobRef::Local(_))
    }

    /// The local path, when the blob is cached
    pub fn local_path(&self) -> Option<&PathBuf> {
        match self {
            BlobRef::Local(path) => Some(path),
            BlobRef::Remote(_) => None,
        }
    }

    /// A URI usable by either kind of consumer (`file://` or the remote URL)
    pub fn as_uri(&self) -> String {
        match self {
            BlobRef::Local(path) => Url::from_file_path(path)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| path.display().to_string()),
            BlobRef::Remote(url) => url.clone(),
        }
    }
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlobCacheStats {
    pub file_count: usize,
    pub total_size: u64,
    pub max_size: u64,
    pub hits: u64,
    pub misses: u64,
    pub downloads: u64,
}

impl fmt::Display for BlobCacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files, {:.1} MB / {:.1} MB",
            self.file_count,
            self.total_size as f64 / MB,
            self.max_size as f64 / MB
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_default() {
        let stats = BlobCacheStats::default();
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_cache_stats_display() {
        let stats = BlobCacheStats {
            file_count: 3,
            total_size: 5 * 1024 * 1024 + 512 * 1024,
            max_size: 100 * 1024 * 1024,
            ..Default::default()
        };
        assert_eq!(stats.to_string(), "3 files, 5.5 MB / 100.0 MB");
    }

    #[test]
    fn test_cache_stats_serialization() {
        let stats = BlobCacheStats {
            file_count: 2,
            total_size: 12345,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"file_count\":2"));
        assert!(json.contains("12345"));
    }

    #[test]
    fn test_blob_ref_remote() {
        let r = BlobRef::Remote("https://cdn.example.com/a.mp4".to_string());
        assert!(!r.is_local());
        assert!(r.local_path().is_none());
        assert_eq!(r.as_uri(), "https://cdn.example.com/a.mp4");
    }

    #[cfg(unix)]
    #[test]
    fn test_blob_ref_local_uri() {
        let r = BlobRef::Local(PathBuf::from("/cache/videos/abc.mp4"));
        assert!(r.is_local());
        assert_eq!(r.as_uri(), "file:///cache/videos/abc.mp4");
    }
}
