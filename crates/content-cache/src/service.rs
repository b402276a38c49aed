//! The cache service handed to every consumer

use crate::config::CacheConfig;
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use file_blob_cache::{BlobCache, HttpDownloader};
use std::sync::Arc;
use std::time::Duration;
use summary_cache::{FileStore, MetadataCache};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Output of the summary backend
#[derive(Debug, Clone)]
pub struct GeneratedSummary {
    pub text: String,
    pub fingerprint: String,
    pub generated_at: DateTime<Utc>,
}

/// The backend that produces summaries on a cache miss
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(
        &self,
        post_id: &str,
    ) -> std::result::Result<GeneratedSummary, Box<dyn std::error::Error + Send + Sync>>;
}

/// A summary served to a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub fingerprint: String,
    pub from_cache: bool,
}

/// Summary and video caches for one application run
///
/// Built once at startup and passed to whatever needs caching. Clones share
/// the same caches.
#[derive(Clone)]
pub struct CacheService {
    summaries: Arc<MetadataCache>,
    videos: BlobCache,
}

impl CacheService {
    pub fn new(summaries: MetadataCache, videos: BlobCache) -> Self {
        Self {
            summaries: Arc::new(summaries),
            videos,
        }
    }

    /// Open the on-disk caches described by `config`
    pub async fn open(config: &CacheConfig) -> Result<Self> {
        let store = FileStore::open(config.summary_store_path()).await?;
        let summaries = MetadataCache::new(Arc::new(store), config.summaries.clone());

        let downloader = HttpDownloader::with_timeout(config.videos.download_timeout())?;
        let videos = BlobCache::new(config.videos.clone(), Arc::new(downloader));
        videos.init().await?;

        info!(
            data_dir = ?config.data_dir,
            video_dir = ?config.videos.cache_dir,
            "Cache service ready"
        );
        Ok(Self::new(summaries, videos))
    }

    pub fn summaries(&self) -> &MetadataCache {
        &self.summaries
    }

    pub fn videos(&self) -> &BlobCache {
        &self.videos
    }

    /// Serve the summary for `post_id`, generating and caching it on a miss
    ///
    /// `expected_fingerprint` is the fingerprint of the post as the caller
    /// sees it now; a cached summary made from different content is
    /// discarded. Only the generator's failure is reported.
    pub async fn summary_or_generate<G>(
        &self,
        post_id: &str,
        expected_fingerprint: Option<&str>,
        generator: &G,
    ) -> Result<Summary>
    where
        G: SummaryGenerator + ?Sized,
    {
        if let Some(entry) = self.summaries.get(post_id, expected_fingerprint).await {
            return Ok(Summary {
                text: entry.value,
                fingerprint: entry.content_fingerprint,
                from_cache: true,
            });
        }

        let generated = generator
            .generate(post_id)
            .await
            .map_err(|e| ServiceError::Generate(e.to_string()))?;

        self.summaries
            .put(
                post_id,
                &generated.text,
                &generated.fingerprint,
                generated.generated_at,
                None,
            )
            .await;
        debug!(post_id = %post_id, "Generated and cached summary");

        Ok(Summary {
            text: generated.text,
            fingerprint: generated.fingerprint,
            from_cache: false,
        })
    }

    /// Run summary cleanup at the interval `config` asks for
    pub fn spawn_configured_cleanup(&self, config: &CacheConfig) -> JoinHandle<()> {
        self.spawn_cleanup(config.cleanup_interval())
    }

    /// Run summary cleanup every `every` until the handle is aborted
    ///
    /// The first pass runs immediately.
    pub fn spawn_cleanup(&self, every: Duration) -> JoinHandle<()> {
        let every = every.max(Duration::from_millis(1));
        let summaries = self.summaries.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                summaries.cleanup().await;
            }
        })
    }
}
