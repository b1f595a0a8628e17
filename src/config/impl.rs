use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Secret de développement; refusé au démarrage en production
pub const DEV_JWT_SECRET: &str = "ecole-dev-secret-change-me";

impl AppConfig {
    /// Charge la configuration : valeurs par défaut, fichiers puis environnement
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config").required(false))
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            .add_source(
                Environment::with_prefix("ECOLE")
                    .separator("_")
                    .try_parsing(true),
            );

        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("cache.default_ttl", std::env::var("REDIS_TTL").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        Ok(app_config)
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("app.system_name", "Portail École")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.unix_socket_path", "")?
            .set_default("server.workers", 0)?
            .set_default("server.max_workers", 8)?
            .set_default("server.timeouts.client_request", 5000)?
            .set_default("server.timeouts.client_disconnect", 1000)?
            .set_default("server.timeouts.keep_alive", 30)?
            .set_default("server.limits.max_payload_size", 16 * 1024 * 1024)?
            .set_default("jwt.secret", DEV_JWT_SECRET)?
            .set_default("jwt.access_token_expiry", 15)?
            .set_default("jwt.refresh_token_expiry", 1)?
            .set_default("jwt.refresh_token_remember_me_expiry", 7)?
            .set_default("argon2.memory_cost", 19456)?
            .set_default("argon2.time_cost", 2)?
            .set_default("argon2.parallelism", 1)?
            .set_default("database.url", "sqlite://ecole.db")?
            .set_default("database.pool_size", 10)?
            .set_default("database.timeout", 30)?
            .set_default("cache.type", "moka")?
            .set_default("cache.default_ttl", 3600)?
            .set_default("cache.redis.url", "redis://127.0.0.1:6379")?
            .set_default("cache.redis.key_prefix", "ecole:")?
            .set_default("cache.redis.pool_size", 10)?
            .set_default("cache.memory.max_capacity", 10000)?
            .set_default("cors.allowed_origins", vec!["*"])?
            .set_default("cors.allowed_methods", vec!["GET", "POST", "PUT", "DELETE"])?
            .set_default("cors.allowed_headers", vec!["*"])?
            .set_default("cors.max_age", 3600)?
            .set_default("upload.dir", "uploads")?
            .set_default("upload.max_size", 10 * 1024 * 1024)?
            .set_default(
                "upload.allowed_extensions",
                vec!["pdf", "png", "jpg", "jpeg", "gif", "webp", "txt", "docx", "odt", "zip"],
            )?
            .set_default("portal.login_code_digits", 3)?
            .set_default("portal.generated_password_length", 10)?
            .set_default("portal.message_page_size", 200)?
            .set_default("portal.message_max_length", 2000)
    }

    /// Instance globale (chargée à la première demande si `init` n'a pas été appelé)
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_file() {
        let config = AppConfig::load().expect("defaults should deserialize");
        assert!(config.server.workers >= 1);
        assert!(config.portal.login_code_digits > 0);
        assert!(config.upload.allowed_extensions.iter().any(|e| e == "pdf"));
    }
}
