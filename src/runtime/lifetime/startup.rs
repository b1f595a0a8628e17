use crate::cache::ObjectCache;
use crate::cache::register::{get_object_cache_plugin, registered_object_cache_plugins};
use crate::config::{AppConfig, DEV_JWT_SECRET};
use crate::errors::{PortalError, Result};
use crate::models::users::entities::{NewUser, UserRole};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn fallback_to_moka() -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin("moka")?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created fallback Moka (in-memory) cache backend");
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create fallback Moka cache: {}", e);
            None
        }
    }
}

/// Construit le cache configuré, avec repli sur le cache mémoire
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    match get_object_cache_plugin(cache_type) {
        Some(constructor) => match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => {
                warn!("Failed to create {} cache: {}", cache_type, e);
                if cache_type != "moka" {
                    warn!("Falling back to memory cache");
                    if let Some(cache) = fallback_to_moka().await {
                        return Ok(cache);
                    }
                }
            }
        },
        None => {
            warn!("Cache backend '{}' not found in registry", cache_type);
            if cache_type != "moka"
                && let Some(cache) = fallback_to_moka().await
            {
                return Ok(cache);
            }
        }
    }

    Err(PortalError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type}, registered: {})",
        registered_object_cache_plugins().join(", ")
    )))
}

/// Crée le compte `admin` tant qu'aucun administrateur n'existe
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users_by_role(UserRole::Admin).await {
        Ok(count) if count > 0 => {
            debug!("{} admin account(s) found, skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No admin account found, creating default admin..."),
        Err(e) => {
            warn!("Failed to count admin accounts: {}, skipping admin seed", e);
            return;
        }
    }

    let (password, initial_password) = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => (password, None),
        _ => {
            let password = generate_password(AppConfig::get().portal.generated_password_length);
            warn!("==========================================================");
            warn!("  ADMIN_PASSWORD NOT SET - USING GENERATED PASSWORD");
            warn!("  Generated admin password: {}", password);
            warn!("  Change it after first login or set ADMIN_PASSWORD");
            warn!("==========================================================");
            (password.clone(), Some(password))
        }
    };

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = NewUser {
        login_code: "admin".to_string(),
        password_hash,
        initial_password,
        role: UserRole::Admin,
        first_name: "Administrateur".to_string(),
        last_name: "Portail".to_string(),
        email: None,
        class_id: None,
    };

    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Default admin account created (ID: {}, login: {})",
            user.id, user.login_code
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// Stockage migré, compte admin garanti et cache prêt
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    if AppConfig::get().jwt.secret == DEV_JWT_SECRET {
        warn!("JWT secret is the development default, set JWT_SECRET before going to production");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}
