//! TTL and fingerprint validated cache over a persistent map

use crate::config::SummaryCacheConfig;
use crate::entry::{CacheEntry, MissReason};
use crate::error::Result;
use crate::store::KvStore;
use cache_core::{
    expiry_from, is_expired, lru_victims, ttl_from_secs, CacheMetadata, Clock, SystemClock,
    DEFAULT_TTL_SECS,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Reserved key of the statistics record, shared namespace with the entries
pub const METADATA_KEY: &str = "__cache_metadata__";

/// Cache of small derived artifacts keyed by a logical id
///
/// Every operation, reads included, runs under one lock per instance: a
/// lookup bumps access statistics, and eviction scans then deletes.
pub struct MetadataCache {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    config: SummaryCacheConfig,
    default_ttl: Duration,
    /// Statistics, loaded from the store on first use
    metadata: Mutex<Option<CacheMetadata>>,
}

impl MetadataCache {
    /// Create a cache over `store` using the wall clock
    pub fn new(store: Arc<dyn KvStore>, config: SummaryCacheConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn KvStore>,
        config: SummaryCacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let default_ttl = match ttl_from_secs(config.default_ttl_secs) {
            Some(ttl) => ttl,
            None => {
                warn!(
                    default_ttl_secs = config.default_ttl_secs,
                    fallback_secs = DEFAULT_TTL_SECS,
                    "Unusable summary cache lifetime, using the default"
                );
                Duration::seconds(DEFAULT_TTL_SECS as i64)
            }
        };

        Self {
            store,
            clock,
            config,
            default_ttl,
            metadata: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SummaryCacheConfig {
        &self.config
    }

    /// Storage key for `key`, or `None` when it would land on the
    /// statistics record
    fn storage_key(&self, key: &str) -> Option<String> {
        let storage_key = format!("{}{}", self.config.key_prefix, key);
        if storage_key == METADATA_KEY {
            warn!(key = %key, "Key collides with the summary cache statistics record");
            return None;
        }
        Some(storage_key)
    }

    /// Look up `key`, validating expiry and, when given, the fingerprint
    ///
    /// Any entry that fails validation is deleted. A hit records the access
    /// on the stored entry, so this writes to storage even though it reads.
    pub async fn get(&self, key: &str, expected_fingerprint: Option<&str>) -> Option<CacheEntry> {
        let mut metadata = self.metadata.lock().await;
        let now = self.clock.now();

        match self.lookup(key, expected_fingerprint, now).await {
            Ok(entry) => {
                debug!(key = %key, hit_count = entry.hit_count, "Summary cache hit");
                self.update_metadata(&mut metadata, CacheMetadata::record_hit)
                    .await;
                Some(entry)
            }
            Err(reason) => {
                debug!(key = %key, reason = %reason, "Summary cache miss");
                self.update_metadata(&mut metadata, CacheMetadata::record_miss)
                    .await;
                None
            }
        }
    }

    async fn lookup(
        &self,
        key: &str,
        expected_fingerprint: Option<&str>,
        now: DateTime<Utc>,
    ) -> std::result::Result<CacheEntry, MissReason> {
        let Some(storage_key) = self.storage_key(key) else {
            return Err(MissReason::NotFound);
        };

        let raw = match self.store.get(&storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(MissReason::NotFound),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read summary cache entry");
                return Err(MissReason::StorageFailure);
            }
        };

        let mut entry = match CacheEntry::decode(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %key, error = %e, "Corrupt summary cache entry, removing");
                self.purge(&storage_key).await;
                return Err(MissReason::Corrupt);
            }
        };

        if is_expired(entry.expires_at, now) {
            self.purge(&storage_key).await;
            return Err(MissReason::Expired);
        }

        if let Some(expected) = expected_fingerprint {
            if expected != entry.content_fingerprint {
                self.purge(&storage_key).await;
                return Err(MissReason::FingerprintMismatch);
            }
        }

        entry.hit_count += 1;
        entry.last_accessed_at = now;
        if let Err(e) = self.write_entry(&storage_key, &entry).await {
            // The value itself is still valid
            warn!(key = %key, error = %e, "Failed to record summary cache access");
        }

        Ok(entry)
    }

    /// Store `value` for `key`, replacing any previous entry
    ///
    /// At capacity the least-recently-accessed share of entries is evicted
    /// first. Without an explicit `expires_at` the entry lives for the
    /// configured default lifetime from `generated_at`.
    pub async fn put(
        &self,
        key: &str,
        value: &str,
        fingerprint: &str,
        generated_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) {
        let Some(storage_key) = self.storage_key(key) else {
            return;
        };
        let mut metadata = self.metadata.lock().await;
        let now = self.clock.now();

        if let Err(e) = self.evict_if_needed().await {
            warn!(error = %e, "Summary cache eviction failed");
        }

        let entry = CacheEntry {
            key: key.to_string(),
            value: value.to_string(),
            content_fingerprint: fingerprint.to_string(),
            created_at: generated_at,
            expires_at: expiry_from(generated_at, expires_at, self.default_ttl),
            last_accessed_at: now,
            hit_count: 0,
        };

        match self.write_entry(&storage_key, &entry).await {
            Ok(()) => {
                debug!(key = %key, expires_at = %entry.expires_at, "Cached summary");
                self.update_metadata(&mut metadata, CacheMetadata::record_save)
                    .await;
            }
            Err(e) => warn!(key = %key, error = %e, "Failed to cache summary"),
        }
    }

    /// Delete the entry for `key`, if any
    pub async fn remove(&self, key: &str) {
        let Some(storage_key) = self.storage_key(key) else {
            return;
        };
        let _guard = self.metadata.lock().await;
        self.purge(&storage_key).await;
    }

    /// Whether a valid entry exists; same side effects as [`Self::get`]
    pub async fn has_valid(&self, key: &str) -> bool {
        self.get(key, None).await.is_some()
    }

    /// Delete every entry and reset the statistics
    pub async fn clear(&self) {
        let mut metadata = self.metadata.lock().await;
        let now = self.clock.now();

        let keys = match self.entry_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Failed to enumerate summary cache for clear");
                Vec::new()
            }
        };
        for storage_key in &keys {
            self.purge(storage_key).await;
        }

        let fresh = CacheMetadata::new(now);
        self.persist_metadata(&fresh).await;
        *metadata = Some(fresh);

        info!(removed = keys.len(), "Summary cache cleared");
    }

    /// Delete expired and unreadable entries, returning how many went
    ///
    /// Only the cleanup timestamp changes in the statistics.
    pub async fn cleanup(&self) -> usize {
        let mut metadata = self.metadata.lock().await;
        let now = self.clock.now();

        let keys = match self.entry_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Failed to enumerate summary cache for cleanup");
                return 0;
            }
        };

        let mut removed = 0;
        for storage_key in keys {
            let stale = match self.store.get(&storage_key).await {
                Ok(Some(raw)) => match CacheEntry::decode(&raw) {
                    Ok(entry) => is_expired(entry.expires_at, now),
                    Err(_) => true,
                },
                Ok(None) => false,
                Err(e) => {
                    warn!(key = %storage_key, error = %e, "Failed to read entry during cleanup");
                    false
                }
            };

            if stale {
                self.purge(&storage_key).await;
                removed += 1;
            }
        }

        self.update_metadata(&mut metadata, |m| m.last_cleanup_at = now)
            .await;

        info!(removed, "Summary cache cleanup finished");
        removed
    }

    /// Current statistics
    pub async fn stats(&self) -> CacheMetadata {
        let mut metadata = self.metadata.lock().await;
        match metadata.as_ref() {
            Some(current) => current.clone(),
            None => {
                let loaded = self.load_metadata().await;
                *metadata = Some(loaded.clone());
                loaded
            }
        }
    }

    /// Number of stored entries, counted from storage
    pub async fn size(&self) -> usize {
        let _guard = self.metadata.lock().await;
        match self.entry_keys().await {
            Ok(keys) => keys.len(),
            Err(e) => {
                warn!(error = %e, "Failed to count summary cache entries");
                0
            }
        }
    }

    /// Evict the least-recently-accessed entries once at capacity
    async fn evict_if_needed(&self) -> Result<()> {
        let keys = self.entry_keys().await?;
        if keys.len() < self.config.capacity {
            return Ok(());
        }

        let mut candidates = Vec::with_capacity(keys.len());
        for storage_key in keys {
            let Some(raw) = self.store.get(&storage_key).await? else {
                continue;
            };
            // Unreadable entries sort first and go before anything valid
            let accessed = CacheEntry::decode(&raw)
                .map(|entry| entry.last_accessed_at)
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            candidates.push((storage_key, accessed));
        }

        let victims = lru_victims(candidates, self.config.eviction_fraction);
        for storage_key in &victims {
            self.purge(storage_key).await;
        }

        info!(
            evicted = victims.len(),
            capacity = self.config.capacity,
            "Evicted least recently accessed summaries"
        );
        Ok(())
    }

    async fn entry_keys(&self) -> Result<Vec<String>> {
        let prefix = &self.config.key_prefix;
        Ok(self
            .store
            .keys()
            .await?
            .into_iter()
            .filter(|k| k != METADATA_KEY && k.starts_with(prefix.as_str()))
            .collect())
    }

    async fn write_entry(&self, storage_key: &str, entry: &CacheEntry) -> Result<()> {
        let raw = entry.encode()?;
        self.store.put(storage_key, raw).await
    }

    async fn purge(&self, storage_key: &str) {
        if let Err(e) = self.store.remove(storage_key).await {
            warn!(key = %storage_key, error = %e, "Failed to remove summary cache entry");
        }
    }

    async fn load_metadata(&self) -> CacheMetadata {
        match self.store.get(METADATA_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(metadata) => return metadata,
                Err(e) => warn!(error = %e, "Corrupt summary cache statistics, starting over"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read summary cache statistics"),
        }
        CacheMetadata::new(self.clock.now())
    }

    async fn persist_metadata(&self, metadata: &CacheMetadata) {
        let result = match serde_json::to_string(metadata) {
            Ok(raw) => self.store.put(METADATA_KEY, raw).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist summary cache statistics");
        }
    }

    async fn update_metadata<F>(&self, slot: &mut Option<CacheMetadata>, update: F)
    where
        F: FnOnce(&mut CacheMetadata),
    {
        let mut metadata = match slot.take() {
            Some(metadata) => metadata,
            None => self.load_metadata().await,
        };
        update(&mut metadata);
        self.persist_metadata(&metadata).await;
        *slot = Some(metadata);
    }
}
