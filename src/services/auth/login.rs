use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::guards::{forbidden, internal_error, reject};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

const BAD_CREDENTIALS: &str = "Identifiant ou mot de passe incorrect";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    let login_code = login_request.login_code.trim().to_lowercase();
    let user = match storage.get_user_by_login_code(&login_code).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("Login rejected: unknown login code");
            return Ok(unauthorized());
        }
        Err(e) => return Ok(internal_error("Login lookup failed", e)),
    };

    if !verify_password(&login_request.password, &user.password_hash) {
        tracing::info!("Login rejected for user {}: wrong password", user.id);
        return Ok(unauthorized());
    }

    // le mot de passe est vérifié avant : pas d'indice sur l'existence d'un compte
    if !user.is_active {
        return Ok(forbidden(
            ErrorCode::AccountDisabled,
            "Ce compte est désactivé",
        ));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to record last login for user {}: {}", user.id, e);
    }

    let role = user.role.to_string();
    let token_pair = match JwtUtils::generate_token_pair(user.id, &role, login_request.remember_me)
    {
        Ok(pair) => pair,
        Err(e) => return Ok(internal_error("Failed to generate JWT token", e)),
    };

    tracing::info!("User {} ({}) logged in", user.id, user.role);

    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60,
        must_change_password: user.initial_password.is_some(),
        user,
    };
    let refresh_cookie =
        JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, login_request.remember_me);

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Connexion réussie")))
}

fn unauthorized() -> HttpResponse {
    reject(
        actix_web::http::StatusCode::UNAUTHORIZED,
        ErrorCode::InvalidCredentials,
        BAD_CREDENTIALS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::body_json;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, new_user};
    use crate::storage::Storage;
    use crate::utils::password::hash_password;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use std::sync::Arc;

    async fn storage_with_account(active: bool) -> Arc<dyn Storage> {
        let storage = memory_storage().await;
        let mut account = new_user("cmartin12", UserRole::Eleve, None);
        account.password_hash = hash_password("Provisoire1").expect("hash");
        let user = storage.create_user_impl(account).await.expect("user");
        if !active {
            storage
                .update_user_impl(
                    user.id,
                    crate::models::users::requests::UpdateUserRequest {
                        is_active: Some(false),
                        ..Default::default()
                    },
                )
                .await
                .expect("deactivate");
        }
        Arc::new(storage)
    }

    fn login(code: &str, password: &str) -> LoginRequest {
        LoginRequest {
            login_code: code.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    #[tokio::test]
    async fn test_login_flow() {
        let storage = storage_with_account(true).await;
        let req = TestRequest::default()
            .app_data(actix_web::web::Data::new(storage))
            .to_http_request();
        let service = AuthService::new_lazy();

        let resp = handle_login(&service, login("CMartin12 ", "Provisoire1"), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp);
        assert_eq!(body["data"]["must_change_password"], true);
        assert!(body["data"]["user"].get("password_hash").is_none());

        let resp = handle_login(&service, login("cmartin12", "mauvais"), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp)["error"], BAD_CREDENTIALS);

        let resp = handle_login(&service, login("inconnu", "Provisoire1"), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_inactive_account_is_refused() {
        let storage = storage_with_account(false).await;
        let req = TestRequest::default()
            .app_data(actix_web::web::Data::new(storage))
            .to_http_request();
        let resp = handle_login(&AuthService::new_lazy(), login("cmartin12", "Provisoire1"), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
