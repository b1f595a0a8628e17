/*!
 * Authentification par jeton JWT
 *
 * Vérifie le jeton d'accès `Authorization: Bearer <jeton>`, charge le compte
 * (cache `user:{id}` puis base), refuse les comptes désactivés et dépose le
 * `User` dans les extensions de la requête.
 *
 * ```rust,ignore
 * web::scope("/api/cours")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_courses))
 * ```
 *
 * Dans un handler :
 *
 * ```rust,ignore
 * let Some(user) = RequireJWT::extract_user_claims(&req) else { ... };
 * ```
 */

use crate::cache::{CacheResult, ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// Raison d'un refus, traduite en statut HTTP
#[derive(Debug)]
enum AuthFailure {
    MissingToken,
    InvalidToken,
    UnknownUser,
    Disabled,
    Internal(String),
}

impl AuthFailure {
    fn response_parts(&self) -> (StatusCode, ErrorCode, &'static str) {
        match self {
            AuthFailure::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Authentification requise",
            ),
            AuthFailure::InvalidToken | AuthFailure::UnknownUser => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Session expirée, veuillez vous reconnecter",
            ),
            AuthFailure::Disabled => (
                StatusCode::FORBIDDEN,
                ErrorCode::AccountDisabled,
                "Ce compte est désactivé",
            ),
            AuthFailure::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Erreur interne du serveur",
            ),
        }
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AuthFailure> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthFailure::MissingToken)?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT validation failed: {}", err);
        AuthFailure::InvalidToken
    })?;
    let user_id = claims.user_id().ok_or(AuthFailure::InvalidToken)?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal("cache missing from app data".into()))?;

    let key = user_cache_key(user_id);
    if let CacheResult::Found(json) = cache.get_raw(&key).await {
        match serde_json::from_str::<User>(&json) {
            Ok(user) => return Ok(user),
            Err(_) => {
                cache.remove(&key).await;
                debug!("Dropping unreadable cache entry {}", key);
            }
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal("storage missing from app data".into()))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| AuthFailure::Internal(e.to_string()))?
        .ok_or(AuthFailure::UnknownUser)?;

    if !user.is_active {
        return Err(AuthFailure::Disabled);
    }

    // seuls les comptes actifs sont mis en cache : l'invalidation couvre la désactivation
    if let Ok(user_json) = serde_json::to_string(&user) {
        cache
            .insert_raw(key, user_json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // pré-vol CORS
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for user {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    if let AuthFailure::Internal(ref detail) = failure {
                        error!("Authentication aborted on {}: {}", req.path(), detail);
                    } else {
                        info!("JWT authentication failed for {}: {:?}", req.path(), failure);
                    }
                    let (status, code, message) = failure.response_parts();
                    Ok(req.into_response(
                        create_error_response(status, code, message).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// Compte authentifié, déposé par le middleware
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_statuses() {
        assert_eq!(
            AuthFailure::MissingToken.response_parts().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthFailure::Disabled.response_parts().0, StatusCode::FORBIDDEN);
        assert_eq!(
            AuthFailure::Disabled.response_parts().1,
            ErrorCode::AccountDisabled
        );
        assert_eq!(
            AuthFailure::Internal("x".into()).response_parts().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
