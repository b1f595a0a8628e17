use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use super::create::{check_profile, check_student_class};
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, requests::UpdateUserRequest},
};
use crate::services::guards::{current_user, forbidden, forget_session, found};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let admin = try_respond!(current_user(request));

    if admin.id == user_id {
        if update_data.is_active == Some(false) {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "Vous ne pouvez pas désactiver votre propre compte",
            ));
        }
        if update_data.role.is_some_and(|role| role != UserRole::Admin) {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "Vous ne pouvez pas retirer votre propre rôle d'administrateur",
            ));
        }
    }

    update_data.first_name = update_data.first_name.map(|n| n.trim().to_string());
    update_data.last_name = update_data.last_name.map(|n| n.trim().to_string());
    update_data.email = update_data.email.map(|e| e.trim().to_string());
    try_respond!(check_profile(
        update_data.first_name.as_deref(),
        update_data.last_name.as_deref(),
        update_data.email.as_deref(),
    ));

    let storage = service.get_storage(request)?;
    let existing = try_respond!(found(
        storage.get_user_by_id(user_id).await,
        ErrorCode::UserNotFound,
        "Utilisateur introuvable",
    ));

    let role = update_data.role.unwrap_or(existing.role);
    if role == UserRole::Eleve {
        let class_id = update_data.class_id.or(existing.class_id);
        update_data.class_id = Some(try_respond!(check_student_class(&storage, class_id).await));
    }

    let user = try_respond!(found(
        storage.update_user(user_id, update_data).await,
        ErrorCode::UserNotFound,
        "Utilisateur introuvable",
    ));
    forget_session(request, user_id).await;

    tracing::info!("User {} updated by admin {}", user_id, admin.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Compte mis à jour")))
}
