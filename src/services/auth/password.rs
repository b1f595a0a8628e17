use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode, auth::requests::ChangePasswordRequest};
use crate::services::guards::{
    bad_request, current_user, db, forget_session, found, internal_error, reject,
};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password;

use super::AuthService;

pub async fn handle_change_password(
    service: &AuthService,
    request: &HttpRequest,
    change: ChangePasswordRequest,
) -> ActixResult<HttpResponse> {
    let session = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    // la session en cache ne porte pas le hachage
    let user = try_respond!(found(
        storage.get_user_by_id(session.id).await,
        ErrorCode::UserNotFound,
        "Utilisateur introuvable",
    ));

    if !verify_password(&change.current_password, &user.password_hash) {
        return Ok(reject(
            actix_web::http::StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidCredentials,
            "Mot de passe actuel incorrect",
        ));
    }
    if change.new_password == change.current_password {
        return Ok(bad_request(
            ErrorCode::PasswordPolicy,
            "Le nouveau mot de passe doit être différent de l'actuel",
        ));
    }
    let policy = validate_password(&change.new_password);
    if !policy.is_valid {
        return Ok(bad_request(ErrorCode::PasswordPolicy, policy.error_message()));
    }

    let hash = match hash_password(&change.new_password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };
    try_respond!(db(storage.set_user_password(user.id, &hash, None).await));
    forget_session(request, user.id).await;

    tracing::info!("User {} changed their password", user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Mot de passe modifié")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::{memory_storage, new_user};
    use crate::models::users::entities::UserRole;
    use actix_web::http::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_change_password_clears_initial_password() {
        let storage = memory_storage().await;
        let mut account = new_user("lbernard", UserRole::Prof, None);
        account.password_hash = hash_password("Provisoire1").expect("hash");
        let user = storage.create_user_impl(account).await.expect("user");
        let shared: Arc<dyn crate::storage::Storage> = Arc::new(storage);
        let req = request_as(&shared, &user);
        let service = AuthService::new_lazy();

        let wrong = ChangePasswordRequest {
            current_password: "Autre123".into(),
            new_password: "Nouveau2025".into(),
        };
        let resp = handle_change_password(&service, &req, wrong).await.expect("response");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let weak = ChangePasswordRequest {
            current_password: "Provisoire1".into(),
            new_password: "court".into(),
        };
        let resp = handle_change_password(&service, &req, weak).await.expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp)["code"], ErrorCode::PasswordPolicy.as_i32());

        let good = ChangePasswordRequest {
            current_password: "Provisoire1".into(),
            new_password: "Nouveau2025".into(),
        };
        let resp = handle_change_password(&service, &req, good).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);

        let reloaded = shared.get_user_by_id(user.id).await.expect("load").expect("user");
        assert!(reloaded.initial_password.is_none());
        assert!(verify_password("Nouveau2025", &reloaded.password_hash));
    }
}
