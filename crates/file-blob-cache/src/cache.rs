//! Directory-backed blob cache populated on demand

use crate::config::BlobCacheConfig;
use crate::download::Downloader;
use crate::error::DownloadError;
use crate::types::{BlobCacheStats, BlobRef};
use cache_core::{blob_file_name, size_victims, Clock, FileUsage, SystemClock};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

type InFlight = Shared<BoxFuture<'static, BlobRef>>;

/// A cache of remote blobs stored as files named by URL hash
///
/// The directory listing is the only index: presence, size and recency all
/// come from the filesystem, with modification time standing in for last
/// access. Cloning is cheap and clones share the same cache.
#[derive(Clone)]
pub struct BlobCache {
    inner: Arc<Inner>,
}

struct Inner {
    config: BlobCacheConfig,
    downloader: Arc<dyn Downloader>,
    clock: Arc<dyn Clock>,
    /// Serializes every change to the directory
    lock: Mutex<()>,
    /// Downloads in progress, keyed by URL
    in_flight: std::sync::Mutex<HashMap<String, InFlight>>,
    temp_seq: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    downloads: AtomicU64,
}

impl BlobCache {
    /// Create a new blob cache
    pub fn new(config: BlobCacheConfig, downloader: Arc<dyn Downloader>) -> Self {
        Self::with_clock(config, downloader, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: BlobCacheConfig,
        downloader: Arc<dyn Downloader>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                downloader,
                clock,
                lock: Mutex::new(()),
                in_flight: std::sync::Mutex::new(HashMap::new()),
                temp_seq: AtomicU64::new(0),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                downloads: AtomicU64::new(0),
            }),
        }
    }

    /// Initialize the cache by ensuring the cache directory exists
    ///
    /// Partial downloads left behind by an earlier run are deleted; only
    /// those belonging to a download this process still has in flight stay.
    pub async fn init(&self) -> io::Result<()> {
        fs::create_dir_all(self.cache_dir()).await?;
        let swept = self.inner.sweep_stale_partials().await;
        info!(cache_dir = ?self.cache_dir(), swept, "Blob cache initialized");
        Ok(())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.inner.config.cache_dir
    }

    /// Path the blob for `url` is (or would be) stored at
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.inner.path_for(url)
    }

    /// Return a local copy of `url`, downloading it on a miss
    ///
    /// A hit refreshes the file's modification time and touches no network.
    /// A miss downloads, publishes the file, then runs eviction. Any failure
    /// returns the original URL instead. The download runs on its own task:
    /// dropping this future does not abort it, and concurrent calls for the
    /// same URL share it.
    pub async fn resolve(&self, url: &str) -> BlobRef {
        let path = self.inner.path_for(url);

        if self.inner.touch_if_present(&path).await {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            debug!(url = %url, path = ?path, "Blob cache hit");
            return BlobRef::Local(path);
        }

        self.inner.misses.fetch_add(1, Ordering::Relaxed);
        debug!(url = %url, "Blob cache miss");
        self.join_or_start(url).await
    }

    fn join_or_start(&self, url: &str) -> InFlight {
        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = in_flight.get(url) {
            debug!(url = %url, "Joining in-flight download");
            return existing.clone();
        }

        let inner = self.inner.clone();
        let task_url = url.to_string();
        let handle = tokio::spawn(async move {
            let resolved = inner.download_and_publish(&task_url).await;
            inner
                .in_flight
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&task_url);
            resolved
        });

        let fallback = url.to_string();
        let shared = async move {
            handle
                .await
                .unwrap_or_else(|_| BlobRef::Remote(fallback))
        }
        .boxed()
        .shared();

        in_flight.insert(url.to_string(), shared.clone());
        shared
    }

    /// Whether `url` is cached; never downloads or touches the file
    pub async fn is_cached(&self, url: &str) -> bool {
        is_file(&self.inner.path_for(url)).await
    }

    /// The cached file for `url`, if present
    pub async fn cached_file_if_present(&self, url: &str) -> Option<PathBuf> {
        let path = self.inner.path_for(url);
        is_file(&path).await.then_some(path)
    }

    /// Delete every file in the cache directory, returning how many went
    pub async fn clear(&self) -> usize {
        let _guard = self.inner.lock.lock().await;

        let mut dir = match fs::read_dir(self.cache_dir()).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(cache_dir = ?self.cache_dir(), error = %e, "Failed to list blob cache");
                return 0;
            }
        };

        let mut removed = 0;
        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read blob cache entry");
                    break;
                }
            };
            let path = entry.path();
            if !is_file(&path).await {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = ?path, error = %e, "Failed to delete cached blob"),
            }
        }

        info!(removed, "Blob cache cleared");
        removed
    }

    /// Get current cache statistics
    pub async fn stats(&self) -> BlobCacheStats {
        let files = self.inner.scan().await;
        BlobCacheStats {
            file_count: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            max_size: self.inner.config.max_size,
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            downloads: self.inner.downloads.load(Ordering::Relaxed),
        }
    }
}

impl Inner {
    fn path_for(&self, url: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(blob_file_name(url, &self.config.default_extension))
    }

    /// Hidden, unique name for a download in progress
    fn temp_path(&self, target: &Path) -> PathBuf {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.config
            .cache_dir
            .join(format!(".{}.{}.{}.part", name, std::process::id(), seq))
    }

    /// Delete abandoned `.part` files, returning how many went
    async fn sweep_stale_partials(&self) -> usize {
        let _guard = self.lock.lock().await;
        let busy = !self
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty();

        let mut dir = match fs::read_dir(&self.config.cache_dir).await {
            Ok(dir) => dir,
            Err(e) => {
                warn!(cache_dir = ?self.config.cache_dir, error = %e, "Failed to list blob cache");
                return 0;
            }
        };

        let mut swept = 0;
        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read blob cache entry");
                    break;
                }
            };
            if !is_stale_partial(&entry.file_name().to_string_lossy(), busy) {
                continue;
            }
            let path = entry.path();
            match fs::remove_file(&path).await {
                Ok(()) => {
                    swept += 1;
                    debug!(path = ?path, "Removed abandoned partial download");
                }
                Err(e) => warn!(path = ?path, error = %e, "Failed to remove partial download"),
            }
        }
        swept
    }

    /// Refresh the recency of `path` if it is cached
    async fn touch_if_present(&self, path: &Path) -> bool {
        let _guard = self.lock.lock().await;
        if !is_file(path).await {
            return false;
        }
        if let Err(e) = set_modified(path, self.clock.now()).await {
            warn!(path = ?path, error = %e, "Failed to refresh cached blob timestamp");
        }
        true
    }

    async fn download_and_publish(&self, url: &str) -> BlobRef {
        let path = self.path_for(url);

        // Published by another task since the caller looked
        if is_file(&path).await {
            return BlobRef::Local(path);
        }

        if let Err(e) = fs::create_dir_all(&self.config.cache_dir).await {
            warn!(cache_dir = ?self.config.cache_dir, error = %e, "Cannot create blob cache directory");
            return BlobRef::Remote(url.to_string());
        }

        let temp = self.temp_path(&path);
        let timeout = self.config.download_timeout();
        let outcome = match tokio::time::timeout(timeout, self.downloader.download(url, &temp)).await
        {
            Ok(result) => result,
            Err(_) => Err(DownloadError::Timeout(timeout)),
        };

        let size = match outcome {
            Ok(size) => size,
            Err(e) => {
                warn!(url = %url, error = %e, "Blob download failed, passing through");
                remove_partial(&temp).await;
                return BlobRef::Remote(url.to_string());
            }
        };
        self.downloads.fetch_add(1, Ordering::Relaxed);

        let _guard = self.lock.lock().await;
        if let Err(e) = fs::rename(&temp, &path).await {
            warn!(url = %url, error = %e, "Failed to publish downloaded blob");
            remove_partial(&temp).await;
            return BlobRef::Remote(url.to_string());
        }
        if let Err(e) = set_modified(&path, self.clock.now()).await {
            warn!(path = ?path, error = %e, "Failed to stamp downloaded blob");
        }
        debug!(url = %url, size, path = ?path, "Cached blob");

        self.evict_if_needed().await;

        // Eviction can claim a blob larger than the low-water mark
        if is_file(&path).await {
            BlobRef::Local(path)
        } else {
            BlobRef::Remote(url.to_string())
        }
    }

    /// Delete the oldest files once the directory exceeds its budget
    ///
    /// Caller holds `lock`.
    async fn evict_if_needed(&self) {
        let files = self.scan().await;
        let victims = size_victims(files, self.config.max_size, self.config.low_water_ratio);
        if victims.is_empty() {
            return;
        }

        let mut evicted = 0;
        for path in &victims {
            match fs::remove_file(path).await {
                Ok(()) => {
                    evicted += 1;
                    debug!(path = ?path, "Evicted cached blob");
                }
                Err(e) => warn!(path = ?path, error = %e, "Failed to evict cached blob"),
            }
        }

        info!(
            evicted,
            max_size = self.config.max_size,
            low_water = self.config.low_water_mark(),
            "Blob cache over budget, evicted oldest files"
        );
    }

    /// Published files in the directory; downloads in progress are skipped
    async fn scan(&self) -> Vec<FileUsage> {
        let mut files = Vec::new();
        let mut dir = match fs::read_dir(&self.config.cache_dir).await {
            Ok(dir) => dir,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(cache_dir = ?self.config.cache_dir, error = %e, "Failed to list blob cache");
                }
                return files;
            }
        };

        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read blob cache entry");
                    break;
                }
            };
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            files.push(FileUsage {
                path: entry.path(),
                size: metadata.len(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
        files
    }
}

/// Whether `name` is a temp download no live download can own
///
/// Temp names are `.{blob}.{pid}.{seq}.part`. While downloads are in flight
/// only partials written by other processes are stale.
fn is_stale_partial(name: &str, busy: bool) -> bool {
    let Some(stem) = name
        .strip_prefix('.')
        .and_then(|n| n.strip_suffix(".part"))
    else {
        return false;
    };
    if !busy {
        return true;
    }
    let pid = std::process::id().to_string();
    stem.rsplitn(3, '.').nth(1) != Some(pid.as_str())
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = ?path, error = %e, "Failed to remove partial download");
        }
    }
}

/// Set the modification time of `path`, the cache's recency signal
async fn set_modified(path: &Path, at: DateTime<Utc>) -> io::Result<()> {
    let path = path.to_path_buf();
    let at = SystemTime::from(at);
    tokio::task::spawn_blocking(move || {
        let file = std::fs::OpenOptions::new().write(true).open(&path)?;
        file.set_modified(at)
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use cache_core::ManualClock;
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Writes a fixed-size body and counts calls
    struct CountingDownloader {
        size: usize,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl CountingDownloader {
        fn new(size: usize) -> Arc<Self> {
            Self::slow(size, Duration::ZERO)
        }

        fn slow(size: usize, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                size,
                delay,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Downloader for CountingDownloader {
        async fn download(&self, _url: &str, dest: &Path) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            fs::write(dest, vec![7u8; self.size]).await?;
            Ok(self.size as u64)
        }
    }

    /// Writes some bytes, then fails
    struct FailingDownloader;

    #[async_trait]
    impl Downloader for FailingDownloader {
        async fn download(&self, _url: &str, dest: &Path) -> Result<u64> {
            fs::write(dest, b"partial").await?;
            Err(DownloadError::Io(Box::new(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset",
            ))))
        }
    }

    /// Writes some bytes, then never finishes
    struct StallingDownloader;

    #[async_trait]
    impl Downloader for StallingDownloader {
        async fn download(&self, _url: &str, dest: &Path) -> Result<u64> {
            fs::write(dest, b"partial").await?;
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(7)
        }
    }

    fn config(dir: &Path, max_size: u64) -> BlobCacheConfig {
        BlobCacheConfig {
            cache_dir: dir.to_path_buf(),
            max_size,
            download_timeout_secs: 1,
            ..Default::default()
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_resolve_downloads_once() {
        let dir = tempdir().unwrap();
        let downloader = CountingDownloader::new(16);
        let cache = BlobCache::new(config(dir.path(), 1024), downloader.clone());
        cache.init().await.unwrap();
        let url = "https://cdn.example.com/videos/clip.mp4";

        let first = cache.resolve(url).await;
        assert!(first.is_local());
        assert_eq!(first.local_path(), Some(&cache.path_for(url)));
        assert_eq!(downloader.calls(), 1);

        let second = cache.resolve(url).await;
        assert_eq!(second, first);
        assert_eq!(downloader.calls(), 1);

        let stats = cache.stats().await;
        assert_eq!(stats.file_count, 1);
        assert_eq!(stats.total_size, 16);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.downloads, 1);
    }

    #[tokio::test]
    async fn test_file_named_by_hash_and_extension() {
        let dir = tempdir().unwrap();
        let cache = BlobCache::new(config(dir.path(), 1024), CountingDownloader::new(4));

        let with_ext = cache.resolve("https://cdn.example.com/a/clip.webm?sig=1").await;
        let without_ext = cache.resolve("https://cdn.example.com/a/stream").await;

        let name = |r: &BlobRef| {
            r.local_path()
                .unwrap()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        };
        assert!(name(&with_ext).ends_with(".webm"));
        assert!(name(&without_ext).ends_with(".mp4"));
        assert_eq!(name(&without_ext).len(), 64 + ".mp4".len());
    }

    #[tokio::test]
    async fn test_existence_checks_do_not_download() {
        let dir = tempdir().unwrap();
        let downloader = CountingDownloader::new(8);
        let cache = BlobCache::new(config(dir.path(), 1024), downloader.clone());
        let url = "https://cdn.example.com/v.mp4";

        assert!(!cache.is_cached(url).await);
        assert!(cache.cached_file_if_present(url).await.is_none());
        assert_eq!(downloader.calls(), 0);

        cache.resolve(url).await;
        assert!(cache.is_cached(url).await);
        assert_eq!(
            cache.cached_file_if_present(url).await,
            Some(cache.path_for(url))
        );
        assert_eq!(downloader.calls(), 1);
    }

    #[tokio::test]
    async fn test_download_failure_passes_through() {
        let dir = tempdir().unwrap();
        let cache = BlobCache::new(config(dir.path(), 1024), Arc::new(FailingDownloader));
        cache.init().await.unwrap();
        let url = "https://cdn.example.com/broken.mp4";

        let resolved = cache.resolve(url).await;

        assert_eq!(resolved, BlobRef::Remote(url.to_string()));
        assert!(!cache.is_cached(url).await);
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_download_timeout_passes_through() {
        let dir = tempdir().unwrap();
        let cache = BlobCache::new(config(dir.path(), 1024), Arc::new(StallingDownloader));
        cache.init().await.unwrap();
        let url = "https://cdn.example.com/slow.mp4";

        let resolved = cache.resolve(url).await;

        assert_eq!(resolved, BlobRef::Remote(url.to_string()));
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_init_removes_abandoned_partials() {
        let dir = tempdir().unwrap();
        let stale = dir.path().join(".abc.mp4.1234.0.part");
        std::fs::write(&stale, vec![0u8; 5000]).unwrap();
        std::fs::write(dir.path().join("kept.mp4"), b"published").unwrap();
        std::fs::write(dir.path().join(".hidden"), b"not a download").unwrap();

        let cache = BlobCache::new(config(dir.path(), 1000), CountingDownloader::new(1));
        cache.init().await.unwrap();

        assert!(!stale.exists());
        let mut entries = dir_entries(dir.path());
        entries.sort();
        assert_eq!(entries, vec![".hidden".to_string(), "kept.mp4".to_string()]);
        assert_eq!(cache.stats().await.total_size, 9);
    }

    #[tokio::test]
    async fn test_init_keeps_partials_of_live_downloads() {
        let dir = tempdir().unwrap();
        let cache = BlobCache::new(config(dir.path(), 1024), Arc::new(StallingDownloader));
        cache.init().await.unwrap();

        let foreign = dir.path().join(".other.mp4.4294967295.3.part");
        std::fs::write(&foreign, b"partial").unwrap();

        let resolving = cache.clone();
        let task = tokio::spawn(async move {
            resolving.resolve("https://cdn.example.com/slow.mp4").await
        });
        tokio::time::sleep(Duration::from_millis(200)).await;

        cache.init().await.unwrap();
        let entries = dir_entries(dir.path());
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with(".part"));
        assert!(!foreign.exists());

        task.await.unwrap();
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[test]
    fn test_is_stale_partial() {
        let own = format!(".a.mp4.{}.7.part", std::process::id());
        assert!(is_stale_partial(&own, false));
        assert!(!is_stale_partial(&own, true));
        assert!(is_stale_partial(".a.mp4.4294967295.7.part", true));
        assert!(!is_stale_partial("a.mp4", false));
        assert!(!is_stale_partial(".hidden", false));
    }

    #[tokio::test]
    async fn test_size_eviction_keeps_recent_hits() {
        let dir = tempdir().unwrap();
        let clock = Arc::new(ManualClock::default());
        let downloader = CountingDownloader::new(30);
        // 100 byte budget, evicts down to 80
        let cache = BlobCache::with_clock(config(dir.path(), 100), downloader.clone(), clock.clone());
        cache.init().await.unwrap();

        let urls = [
            "https://cdn.example.com/a.mp4",
            "https://cdn.example.com/b.mp4",
            "https://cdn.example.com/c.mp4",
            "https://cdn.example.com/d.mp4",
        ];

        for url in &urls[..3] {
            assert!(cache.resolve(url).await.is_local());
            clock.advance(ChronoDuration::seconds(10));
        }
        assert_eq!(cache.stats().await.total_size, 90);

        // Oldest download, but just read
        assert!(cache.resolve(urls[0]).await.is_local());
        clock.advance(ChronoDuration::seconds(10));

        assert!(cache.resolve(urls[3]).await.is_local());

        assert!(cache.is_cached(urls[0]).await);
        assert!(!cache.is_cached(urls[1]).await);
        assert!(!cache.is_cached(urls[2]).await);
        assert!(cache.is_cached(urls[3]).await);

        let stats = cache.stats().await;
        assert!(stats.total_size <= 80);
        assert_eq!(stats.file_count, 2);
        assert_eq!(downloader.calls(), 4);
    }

    #[tokio::test]
    async fn test_oversized_blob_passes_through() {
        let dir = tempdir().unwrap();
        let cache = BlobCache::new(config(dir.path(), 100), CountingDownloader::new(500));
        let url = "https://cdn.example.com/huge.mp4";

        assert_eq!(cache.resolve(url).await, BlobRef::Remote(url.to_string()));
        assert!(!cache.is_cached(url).await);
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_download() {
        let dir = tempdir().unwrap();
        let downloader = CountingDownloader::slow(8, Duration::from_millis(100));
        let cache = BlobCache::new(config(dir.path(), 1024), downloader.clone());
        let url = "https://cdn.example.com/shared.mp4";

        let (a, b) = tokio::join!(cache.resolve(url), cache.resolve(url));

        assert!(a.is_local());
        assert_eq!(a, b);
        assert_eq!(downloader.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_caller_still_populates() {
        let dir = tempdir().unwrap();
        let downloader = CountingDownloader::slow(8, Duration::from_millis(100));
        let cache = BlobCache::new(config(dir.path(), 1024), downloader.clone());
        let url = "https://cdn.example.com/abandoned.mp4";

        let requester = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.resolve(url).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        requester.abort();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(cache.is_cached(url).await);
        assert_eq!(downloader.calls(), 1);

        assert!(cache.resolve(url).await.is_local());
        assert_eq!(downloader.calls(), 1);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let dir = tempdir().unwrap();
        let cache = BlobCache::new(config(dir.path(), 1024), CountingDownloader::new(10));

        cache.resolve("https://cdn.example.com/1.mp4").await;
        cache.resolve("https://cdn.example.com/2.mp4").await;
        assert_eq!(cache.stats().await.file_count, 2);

        assert_eq!(cache.clear().await, 2);
        let stats = cache.stats().await;
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.total_size, 0);
        assert!(!cache.is_cached("https://cdn.example.com/1.mp4").await);
    }

    #[tokio::test]
    async fn test_clear_missing_directory() {
        let dir = tempdir().unwrap();
        let cache = BlobCache::new(
            config(&dir.path().join("never-created"), 1024),
            CountingDownloader::new(1),
        );
        assert_eq!(cache.clear().await, 0);
        assert_eq!(cache.stats().await.file_count, 0);
    }
}
