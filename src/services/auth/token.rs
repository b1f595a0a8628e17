use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::guards::{current_user, found, internal_error, reject};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn session_expired() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Session expirée, veuillez vous reconnecter",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(reject(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Authentification requise",
        ));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(session_expired());
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(session_expired());
    };

    // le rôle peut avoir changé depuis la connexion : on repart de la base
    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => return Ok(session_expired()),
        Err(e) => return Ok(internal_error("Refresh lookup failed", e)),
    };

    let access_token = match JwtUtils::generate_access_token(user.id, &user.role.to_string()) {
        Ok(token) => token,
        Err(e) => return Ok(internal_error("Failed to generate JWT token", e)),
    };

    let response = RefreshTokenResponse {
        access_token,
        expires_in: service.get_config().jwt.access_token_expiry * 60,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Session prolongée")))
}

pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let user = try_respond!(found(
        storage.get_user_by_id(session.id).await,
        ErrorCode::UserNotFound,
        "Utilisateur introuvable",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse {
            must_change_password: user.initial_password.is_some(),
            user,
        },
        "Utilisateur courant",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::body_json;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::fixture;
    use crate::utils::jwt::{REFRESH_TOKEN_COOKIE, TokenKind};
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use std::sync::Arc;

    fn request_with_cookie(storage: &Arc<dyn Storage>, token: Option<String>) -> HttpRequest {
        let mut req = TestRequest::default().app_data(actix_web::web::Data::new(storage.clone()));
        if let Some(token) = token {
            req = req.cookie(Cookie::new(REFRESH_TOKEN_COOKIE, token));
        }
        req.to_http_request()
    }

    fn refresh_token_for(user_id: i64, role: &str) -> String {
        JwtUtils::generate_token(user_id, role, TokenKind::Refresh, chrono::Duration::days(1))
            .expect("token")
    }

    #[tokio::test]
    async fn test_refresh_issues_access_token() {
        let f = fixture().await;
        let req = request_with_cookie(&f.shared(), Some(refresh_token_for(f.student.id, "eleve")));

        let resp = handle_refresh_token(&AuthService::new_lazy(), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp);
        let token = body["data"]["access_token"].as_str().expect("access token");
        let claims = JwtUtils::verify_access_token(token).expect("valid access token");
        assert_eq!(claims.user_id(), Some(f.student.id));
        assert!(body["data"]["expires_in"].as_i64().unwrap_or_default() > 0);
    }

    #[tokio::test]
    async fn test_refresh_without_cookie() {
        let f = fixture().await;
        let req = request_with_cookie(&f.shared(), None);
        let resp = handle_refresh_token(&AuthService::new_lazy(), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_access_token_is_not_a_refresh_token() {
        let f = fixture().await;
        let access = JwtUtils::generate_access_token(f.student.id, "eleve").expect("token");
        let req = request_with_cookie(&f.shared(), Some(access));

        let resp = handle_refresh_token(&AuthService::new_lazy(), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        // le cookie invalide est effacé
        assert!(resp.cookies().any(|c| c.name() == REFRESH_TOKEN_COOKIE));
    }

    #[tokio::test]
    async fn test_refresh_for_unknown_user() {
        let f = fixture().await;
        let req = request_with_cookie(&f.shared(), Some(refresh_token_for(9999, "eleve")));
        let resp = handle_refresh_token(&AuthService::new_lazy(), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
