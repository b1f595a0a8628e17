use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::UserService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{NewUser, User, UserRole},
        requests::CreateUserRequest,
        responses::{CreateUserResponse, UserCredentials},
    },
};
use crate::services::guards::{
    Guarded, bad_request, blank_to_none, found, internal_error, is_conflict,
};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::{generate_login_code, generate_password};
use crate::utils::validate::{validate_email, validate_person_name};

// tirages d'identifiant avant d'abandonner
const LOGIN_CODE_ATTEMPTS: usize = 8;

pub(crate) fn check_profile(
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
) -> Guarded<()> {
    for name in [first_name, last_name].into_iter().flatten() {
        validate_person_name(name).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }
    if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
        validate_email(email.trim()).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    }
    Ok(())
}

/// Un élève est toujours rattaché à une classe existante
pub(crate) async fn check_student_class(
    storage: &Arc<dyn Storage>,
    class_id: Option<i64>,
) -> Guarded<i64> {
    let Some(class_id) = class_id else {
        return Err(bad_request(
            ErrorCode::ValidationFailed,
            "Un élève doit être rattaché à une classe",
        ));
    };
    found(
        storage.get_class_by_id(class_id).await,
        ErrorCode::ClassNotFound,
        "Classe introuvable",
    )
    .map(|class| class.id)
}

/// Insère le compte en tirant un nouvel identifiant tant qu'il est déjà pris
async fn insert_with_fresh_login_code(
    storage: &Arc<dyn Storage>,
    template: NewUser,
    digits: usize,
) -> Guarded<User> {
    for _ in 0..LOGIN_CODE_ATTEMPTS {
        let mut candidate = template.clone();
        candidate.login_code =
            generate_login_code(&template.first_name, &template.last_name, digits);
        match storage.create_user(candidate).await {
            Ok(user) => return Ok(user),
            Err(e) if is_conflict(&e) => {
                tracing::debug!("Login code collision, drawing again");
            }
            Err(e) => return Err(internal_error("User creation failed", e)),
        }
    }
    Err(internal_error(
        "User creation failed",
        "no free login code after several attempts",
    ))
}

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let first_name = user_data.first_name.trim().to_string();
    let last_name = user_data.last_name.trim().to_string();
    try_respond!(check_profile(
        Some(&first_name),
        Some(&last_name),
        user_data.email.as_deref(),
    ));

    let storage = service.get_storage(request)?;
    let class_id = match user_data.role {
        UserRole::Eleve => Some(try_respond!(check_student_class(&storage, user_data.class_id).await)),
        _ => None,
    };

    let portal = &AppConfig::get().portal;
    let password = generate_password(portal.generated_password_length);
    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };

    let template = NewUser {
        login_code: String::new(),
        password_hash,
        initial_password: Some(password.clone()),
        role: user_data.role,
        first_name,
        last_name,
        email: blank_to_none(user_data.email),
        class_id,
    };
    let user = try_respond!(
        insert_with_fresh_login_code(&storage, template, portal.login_code_digits).await
    );

    tracing::info!("Created {} account {} ({})", user.role, user.id, user.login_code);
    let response = CreateUserResponse {
        credentials: UserCredentials {
            user_id: user.id,
            login_code: user.login_code.clone(),
            password,
        },
        user,
    };
    Ok(HttpResponse::Created().json(ApiResponse::success(response, "Compte créé")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    fn request(role: UserRole, class_id: Option<i64>) -> CreateUserRequest {
        CreateUserRequest {
            role,
            first_name: "Éloïse".into(),
            last_name: "Le Bihan".into(),
            email: None,
            class_id,
        }
    }

    #[tokio::test]
    async fn test_create_student_generates_credentials() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.admin);

        let resp = create_user(&UserService::new_lazy(), request(UserRole::Eleve, Some(f.class.id)), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp);
        let code = body["data"]["credentials"]["login_code"].as_str().unwrap_or_default().to_string();
        assert!(code.starts_with("elebihan"));
        let password = body["data"]["credentials"]["password"].as_str().unwrap_or_default().to_string();

        let stored = storage.get_user_by_login_code(&code).await.expect("load").expect("user");
        assert_eq!(stored.class_id, Some(f.class.id));
        assert_eq!(stored.initial_password.as_deref(), Some(password.as_str()));
        assert!(crate::utils::password::verify_password(&password, &stored.password_hash));
    }

    #[tokio::test]
    async fn test_student_requires_existing_class() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.admin);
        let service = UserService::new_lazy();

        let resp = create_user(&service, request(UserRole::Eleve, None), &req).await.expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = create_user(&service, request(UserRole::Eleve, Some(999)), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // la classe est ignorée pour un prof
        let resp = create_user(&service, request(UserRole::Prof, Some(f.class.id)), &req)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert!(body_json(resp)["data"]["user"]["class_id"].is_null());
    }
}
