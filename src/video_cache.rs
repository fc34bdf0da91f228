//! Read-through cache for the latest video record.

use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::{
    cache::KeyValueStore,
    config::{settings::DEFAULT_CACHE_KEY, settings::ONE_DAY_IN_SECONDS, Config},
    error::Result,
    youtube::{VideoRecord, VideoSource},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub key: String,
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            key: DEFAULT_CACHE_KEY.to_string(),
            ttl_secs: ONE_DAY_IN_SECONDS,
        }
    }
}

impl CacheSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            key: config.cache_key.clone(),
            ttl_secs: config.cache_ttl_secs,
        }
    }
}

/// Serves the cached record when present, otherwise fetches from `source`
/// and stores the result for `ttl_secs`. Failed fetches are never cached.
/// Concurrent misses each fetch; the last write wins.
pub struct VideoCache {
    source: Arc<dyn VideoSource>,
    store: Arc<dyn KeyValueStore>,
    settings: CacheSettings,
}

impl VideoCache {
    pub fn new(
        source: Arc<dyn VideoSource>,
        store: Arc<dyn KeyValueStore>,
        settings: CacheSettings,
    ) -> Self {
        info!(
            "Initializing latest video cache (key: {}, TTL: {}s)",
            settings.key, settings.ttl_secs
        );
        Self {
            source,
            store,
            settings,
        }
    }

    pub async fn get_latest(&self) -> Result<VideoRecord> {
        if let Some(record) = self.read_cached().await {
            info!("Cache HIT for key: {}", self.settings.key);
            return Ok(record);
        }

        info!("Cache MISS for key: {}", self.settings.key);
        let record = self.source.fetch_latest().await?;
        self.write_back(&record).await;
        Ok(record)
    }

    /// Absent, malformed and unreachable all count as a miss.
    async fn read_cached(&self) -> Option<VideoRecord> {
        let raw = match self.store.get(&self.settings.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed, fetching directly: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<VideoRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    "Failed to deserialize cached JSON for key {}: {}. Data: '{}'",
                    self.settings.key, e, raw
                );
                None
            }
        }
    }

    async fn write_back(&self, record: &VideoRecord) {
        let value = match serde_json::to_string(record) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to serialize record {} for cache: {}", record.id, e);
                return;
            }
        };
        if let Err(e) = self
            .store
            .set_ex(&self.settings.key, &value, self.settings.ttl_secs)
            .await
        {
            warn!("Cache write failed for key {}: {}", self.settings.key, e);
        }
    }
}

#[async_trait]
impl VideoSource for VideoCache {
    async fn fetch_latest(&self) -> Result<VideoRecord> {
        self.get_latest().await
    }
}
