use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use std::sync::Mutex;
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

/// Sessions partagées entre instances du portail.
///
/// Toutes les clés sont préfixées par `cache.redis.key_prefix`; la connexion
/// multiplexée est ouverte au premier usage puis réutilisée.
pub struct RedisObjectCache {
    client: redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // un serveur injoignable doit échouer ici pour que le démarrage passe sur moka
        let mut conn = client.get_connection().map_err(|e| {
            error!("Failed to connect to Redis at {}: {}", redis_config.url, e);
            format!("Redis connection failed: {e}")
        })?;
        redis::cmd("PING")
            .query::<String>(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;

        debug!(
            "Redis session cache ready (prefix '{}', TTL {}s)",
            redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            connection: Mutex::new(None),
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    fn cached_connection(&self) -> Option<MultiplexedConnection> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        if let Some(conn) = self.cached_connection() {
            return Some(conn);
        }
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => {
                *self
                    .connection
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(conn.clone());
                Some(conn)
            }
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    /// Après une erreur réseau, la prochaine opération rouvre la connexion
    fn drop_connection(&self) {
        *self
            .connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn effective_ttl(&self, ttl: u64) -> u64 {
        if ttl == 0 { self.default_ttl } else { ttl }
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.make_key(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => {
                debug!("Cache miss for {}", key);
                CacheResult::NotFound
            }
            Err(e) => {
                error!("Failed to read '{}' from Redis: {}", key, e);
                self.drop_connection();
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = self.effective_ttl(ttl);
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.make_key(&key), value, ttl)
            .await
        {
            error!("Failed to write '{}' to Redis: {}", key, e);
            self.drop_connection();
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        match conn.del::<_, i64>(self.make_key(key)).await {
            Ok(0) => debug!("Nothing cached under {}", key),
            Ok(_) => debug!("Evicted {} from Redis", key),
            Err(e) => {
                error!("Failed to evict '{}' from Redis: {}", key, e);
                self.drop_connection();
            }
        }
    }

    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = format!("{}*", self.key_prefix);
        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let page = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(200)
                .query_async::<(u64, Vec<String>)>(&mut conn)
                .await;
            match page {
                Ok((next, batch)) => {
                    keys.extend(batch);
                    if next == 0 {
                        break;
                    }
                    cursor = next;
                }
                Err(e) => {
                    warn!("Failed to scan keys matching '{}': {}", pattern, e);
                    return;
                }
            }
        }
        if keys.is_empty() {
            return;
        }

        match conn.del::<_, i64>(keys).await {
            Ok(count) => debug!("Invalidated {} cached session(s)", count),
            Err(e) => warn!("Failed to invalidate keys matching '{}': {}", pattern, e),
        }
    }
}
