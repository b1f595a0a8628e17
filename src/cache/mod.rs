//! Cache d'objets (sessions utilisateur).
//!
//! Les backends s'enregistrent eux-mêmes au chargement du binaire via
//! [`declare_object_cache_plugin!`]; le démarrage choisit celui nommé par
//! `cache.type`.

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Résultat d'une lecture dans le cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// La clé existe mais la valeur est illisible (ou le backend a échoué)
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` en secondes, 0 pour la durée par défaut
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    tracing::debug!("Cached value for '{}' is not decodable: {}", key, e);
                    CacheResult::ExistsButNoValue
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    pub async fn insert<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key, raw, ttl).await,
            Err(e) => tracing::error!("Failed to serialize cache value for '{}': {}", key, e),
        }
    }
}

/// Clé de cache de la session d'un utilisateur
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// Enregistre un backend de cache sous `$name` au chargement du binaire.
/// Le type doit exposer `fn new() -> Result<Self, String>`.
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::PortalError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
