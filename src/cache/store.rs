//! Cache store trait and the in-memory TTL implementation

use crate::cache::{
    config::CacheConfig,
    entry::CacheEntry,
    types::{CacheKey, CacheStats},
};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Key-value store with per-entry expiration
///
/// `get` returns `Ok(None)` for keys that were never written and for keys
/// whose TTL has elapsed. Implementations are shared across concurrent
/// requests; last writer wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<()>;
}

/// In-process cache with TTL expiry and LRU eviction
///
/// - Thread-safe async access via RwLock
/// - Expired entries are dropped lazily on read and by [`start_auto_cleanup`]
/// - Least recently used entry is evicted once `max_entries` is reached
pub struct MemoryCache {
    pub(crate) config: CacheConfig,
    store: Arc<RwLock<Store>>,
}

struct Store {
    entries: HashMap<CacheKey, CacheEntry>,

    /// LRU tracking: front is least recently used
    lru_queue: VecDeque<CacheKey>,

    stats: CacheStats,
}

impl MemoryCache {
    pub fn new(config: CacheConfig) -> Self {
        info!("Initializing in-memory cache with config: {:?}", config);

        Self {
            config,
            store: Arc::new(RwLock::new(Store {
                entries: HashMap::new(),
                lru_queue: VecDeque::new(),
                stats: CacheStats::default(),
            })),
        }
    }

    /// Remove all expired entries, returning how many were dropped
    pub async fn cleanup_expired(&self) -> usize {
        let mut store = self.store.write().await;

        let expired_keys: Vec<CacheKey> = store
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            Self::remove_entry(&mut store, key);
        }
        store.stats.evictions_ttl += expired_keys.len() as u64;

        if !expired_keys.is_empty() {
            debug!("Cleaned up {} expired entries", expired_keys.len());
        }

        expired_keys.len()
    }

    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let mut stats = store.stats.clone();
        stats.entries = store.entries.len();
        stats
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.entries.is_empty()
    }

    fn remove_entry(store: &mut Store, key: &str) {
        if store.entries.remove(key).is_some() {
            store.lru_queue.retain(|k| k != key);
        }
    }

    fn touch(store: &mut Store, key: &str) {
        store.lru_queue.retain(|k| k != key);
        store.lru_queue.push_back(key.to_string());
    }

    fn evict_if_needed(&self, store: &mut Store) {
        while store.entries.len() >= self.config.max_entries {
            match store.lru_queue.pop_front() {
                Some(key) => {
                    debug!("Evicting entry due to max_entries limit: {}", key);
                    store.entries.remove(&key);
                    store.stats.evictions_capacity += 1;
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut store = self.store.write().await;

        let value = match store.entries.get(key).map(|entry| entry.is_expired()) {
            Some(true) => {
                debug!("Cache entry expired: {}", key);
                Self::remove_entry(&mut store, key);
                store.stats.evictions_ttl += 1;
                None
            }
            Some(false) => store.entries.get(key).map(|entry| entry.value.clone()),
            None => None,
        };

        match value {
            Some(value) => {
                Self::touch(&mut store, key);
                store.stats.hits += 1;
                Ok(Some(value))
            }
            None => {
                store.stats.misses += 1;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(key.to_string(), value.clone(), ttl);
        let mut store = self.store.write().await;

        if store.entries.contains_key(key) {
            debug!("Updating existing cache entry: {}", key);
        } else {
            self.evict_if_needed(&mut store);
            debug!("Inserting new cache entry: {}", key);
        }

        store.entries.insert(key.to_string(), entry);
        Self::touch(&mut store, key);

        Ok(())
    }
}

/// Background task for automatic cache cleanup
pub async fn start_auto_cleanup(cache: Arc<MemoryCache>) {
    let interval = cache.config.cleanup_interval;

    if !cache.config.enable_auto_cleanup {
        warn!("Automatic cache cleanup disabled; expired entries are only dropped on read");
        return;
    }

    info!("Starting automatic cache cleanup task (interval: {:?})", interval);

    loop {
        tokio::time::sleep(interval).await;

        let removed = cache.cleanup_expired().await;
        if removed > 0 {
            debug!("Auto cleanup removed {} entries", removed);
        }
    }
}
