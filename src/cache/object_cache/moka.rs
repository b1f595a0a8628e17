use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// Cache en mémoire du processus. La durée de vie est globale (`cache.default_ttl`).
pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_settings(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_settings(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(std::time::Duration::from_secs(ttl_secs))
            .build();
        debug!("MokaCacheWrapper initialized with max capacity: {}", max_capacity);
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
        // pas de TTL par entrée : moka applique celui du builder
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}
