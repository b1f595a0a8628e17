//! Limitation de débit en fenêtre fixe.
//!
//! Une clé `préfixe:fenêtre:identifiant` compte les requêtes d'une IP (ou
//! d'un compte déjà authentifié) ; au-delà du seuil la réponse est 429.
//!
//! ```rust,ignore
//! web::resource("/login")
//!     .wrap(RateLimit::login())
//!     .route(web::post().to(login))
//! ```

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

// les fenêtres passées expirent d'elles-mêmes
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

const MAX_WINDOW_SECS: u64 = 3600;

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    // secondes
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// Connexion : 5 par minute et par IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// Téléversement : 10 par minute et par compte
    pub fn file_upload() -> Self {
        Self::new(10, 60).with_prefix("upload")
    }
}

/// Clé de compteur pour la fenêtre contenant `now` (secondes unix)
fn window_key(prefix: &str, identifier: &str, now: u64, window_secs: u64) -> String {
    let window = now / window_secs;
    if prefix.is_empty() {
        format!("{window}:{identifier}")
    } else {
        format!("{prefix}:{window}:{identifier}")
    }
}

/// Compte un passage ; `None` si la limite est déjà atteinte, sinon le
/// nombre de requêtes restantes
async fn register_hit(cache: &Cache<String, u32>, key: &str, max_requests: u32) -> Option<u32> {
    let current = cache.get(key).await.unwrap_or(0);
    if current >= max_requests {
        return None;
    }
    cache.insert(key.to_string(), current + 1).await;
    Some(max_requests.saturating_sub(current + 1))
}

/// IP du client : adresse de connexion, puis X-Forwarded-For, puis X-Real-IP.
/// Derrière un proxy, celui-ci doit renseigner ces en-têtes.
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // premier saut seulement
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    use crate::models::users::entities::User;
    req.extensions().get::<User>().map(|user| user.id)
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    let retry_after = retry_after.max(1);
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            format!("Trop de tentatives, réessayez dans {retry_after} s"),
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let max_requests = self.max_requests;
        let window_secs = self.window_secs;
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{}", id))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let cache_key = window_key(&key_prefix, &identifier, now, window_secs);

            let Some(remaining) = register_hit(&RATE_LIMIT_CACHE, &cache_key, max_requests).await
            else {
                warn!("Rate limit exceeded for key: {} (max {})", cache_key, max_requests);
                let retry_after = window_secs - now % window_secs;
                return Ok(req
                    .into_response(create_rate_limit_response(retry_after).map_into_right_body()));
            };

            let mut res = srv.call(req).await?;
            res.headers_mut().insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let upload = RateLimit::file_upload();
        assert_eq!(upload.max_requests, 10);
        assert_eq!(upload.key_prefix, "upload");
    }

    #[tokio::test]
    async fn test_register_hit_blocks_after_limit() {
        let cache: Cache<String, u32> = Cache::builder().max_capacity(10).build();
        assert_eq!(register_hit(&cache, "login:ip:1.2.3.4", 2).await, Some(1));
        assert_eq!(register_hit(&cache, "login:ip:1.2.3.4", 2).await, Some(0));
        assert_eq!(register_hit(&cache, "login:ip:1.2.3.4", 2).await, None);
        // autre IP, autre compteur
        assert_eq!(register_hit(&cache, "login:ip:5.6.7.8", 2).await, Some(1));
    }

    #[test]
    fn test_window_key_rolls_over() {
        assert_eq!(window_key("login", "ip:1.2.3.4", 119, 60), "login:1:ip:1.2.3.4");
        assert_eq!(window_key("login", "ip:1.2.3.4", 120, 60), "login:2:ip:1.2.3.4");
        assert_eq!(window_key("", "user:7", 30, 60), "0:user:7");
    }

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("192.168.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("pas-une-ip"));
    }
}
