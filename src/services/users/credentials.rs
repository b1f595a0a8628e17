use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        requests::CredentialSheetQuery,
        responses::{CredentialSheetEntry, UserCredentials},
    },
};
use crate::services::guards::{db, forget_session, found, internal_error, not_found};
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_password;

/// Nouveau mot de passe provisoire ; l'ancien cesse immédiatement de fonctionner
pub async fn regenerate_credentials(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = try_respond!(found(
        storage.get_user_by_id(user_id).await,
        ErrorCode::UserNotFound,
        "Utilisateur introuvable",
    ));

    let password = generate_password(AppConfig::get().portal.generated_password_length);
    let hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };
    if !try_respond!(db(storage
        .set_user_password(user.id, &hash, Some(password.clone()))
        .await))
    {
        return Ok(not_found(ErrorCode::UserNotFound, "Utilisateur introuvable"));
    }
    forget_session(request, user.id).await;

    tracing::info!("Credentials regenerated for user {}", user.id);
    let credentials = UserCredentials {
        user_id: user.id,
        login_code: user.login_code,
        password,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        credentials,
        "Nouveau mot de passe provisoire",
    )))
}

/// Fiche à imprimer : comptes n'ayant pas encore choisi leur mot de passe
pub async fn credential_sheet(
    service: &UserService,
    query: CredentialSheetQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let users = try_respond!(db(storage.list_pending_credentials(query.class_id).await));

    let entries: Vec<CredentialSheetEntry> = users
        .into_iter()
        .filter_map(|user| {
            let initial_password = user.initial_password?;
            Some(CredentialSheetEntry {
                user_id: user.id,
                login_code: user.login_code,
                initial_password,
                first_name: user.first_name,
                last_name: user.last_name,
                role: user.role,
                class_id: user.class_id,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(entries, "Fiche des identifiants")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;
    use crate::utils::password::verify_password;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_regenerate_then_sheet() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.admin);
        let service = UserService::new_lazy();

        let resp = regenerate_credentials(&service, f.student.id, &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let password = body_json(resp)["data"]["password"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let reloaded = storage.get_user_by_id(f.student.id).await.expect("load").expect("user");
        assert!(verify_password(&password, &reloaded.password_hash));

        let resp = credential_sheet(
            &service,
            CredentialSheetQuery {
                class_id: Some(f.class.id),
            },
            &req,
        )
        .await
        .expect("response");
        let body = body_json(resp);
        let entries = body["data"].as_array().cloned().unwrap_or_default();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["initial_password"], password.as_str());

        let resp = regenerate_credentials(&service, 999, &req).await.expect("response");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
