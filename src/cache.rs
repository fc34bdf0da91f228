// src/cache.rs
//! Key-value stores backing the latest-video cache.
//!
//! `RedisStore` is the production backend; expiry is enforced by Redis via
//! `SET key value EX seconds`. `MemoryStore` mirrors that contract in
//! process for local runs and tests.

use crate::error::{Result, VideoError};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use redis::{aio::ConnectionManager, AsyncCommands};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// The two store commands the cache needs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
}

/// A shared Redis store.
/// Uses a `ConnectionManager` for automatic reconnection and resilience.
#[derive(Clone)]
pub struct RedisStore {
    conn_manager: ConnectionManager,
    redis_url: String,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("redis_url", &self.redis_url)
            .field("conn_manager", &"<ConnectionManager instance>")
            .finish()
    }
}

impl RedisStore {
    pub async fn new(redis_url: &str) -> Result<Self> {
        info!("Initializing Redis connection manager for URL: {}", redis_url);
        let client = redis::Client::open(redis_url).map_err(|e| {
            VideoError::ConfigError(format!("Invalid REDIS_URL '{}': {}", redis_url, e))
        })?;
        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to create Redis ConnectionManager: {}", e);
            VideoError::CacheUnavailable(format!("Failed to create Redis ConnectionManager: {}", e))
        })?;
        info!("Redis ConnectionManager initialized successfully.");
        Ok(Self {
            conn_manager,
            redis_url: redis_url.to_string(),
        })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        debug!("Attempting to GET cache for key: {}", key);
        let mut conn = self.conn_manager.clone();
        conn.get::<_, Option<String>>(key).await.map_err(|e| {
            error!("Redis GET error for key {}: {}", key, e);
            VideoError::CacheUnavailable(format!("Redis GET error for key {}: {}", key, e))
        })
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        match conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            Ok(_) => {
                debug!("Cache SETEX success for key: {} with TTL: {}s", key, ttl_secs);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to SETEX key '{}' in Redis: {}", key, e);
                Err(VideoError::CacheUnavailable(format!(
                    "Redis SETEX error for key {}: {}",
                    key, e
                )))
            }
        }
    }
}

/// In-process store with per-entry expiry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a raw value, e.g. to simulate a corrupted entry.
    pub async fn insert_raw(&self, key: &str, value: &str, ttl_secs: u64) {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value.to_string(), expires_at));
    }

    /// Seconds left before `key` expires, if present.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .map(|(_, expires_at)| expires_at.saturating_duration_since(Instant::now()).as_secs())
            .filter(|secs| *secs > 0)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((_, expires_at)) if Instant::now() >= *expires_at => {
                debug!("Memory cache entry for key {} expired", key);
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        self.insert_raw(key, value, ttl_secs).await;
        Ok(())
    }
}
