use crate::cache::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Appelé par `declare_object_cache_plugin!` avant `main`
pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    let mut registry = OBJECT_CACHE_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .cloned()
}

pub fn registered_object_cache_plugins() -> Vec<String> {
    let mut names: Vec<String> = OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .keys()
        .cloned()
        .collect();
    names.sort();
    names
}

pub fn debug_object_cache_registry() {
    let registry = OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registry.is_empty() {
        tracing::debug!("No object cache plugins registered.");
    } else {
        tracing::debug!("Registered object cache plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}
