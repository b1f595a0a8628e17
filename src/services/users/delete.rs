use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::guards::{current_user, db, forbidden, forget_session, not_found};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let admin = try_respond!(current_user(request));
    if admin.id == user_id {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Vous ne pouvez pas supprimer votre propre compte",
        ));
    }

    let storage = service.get_storage(request)?;
    if !try_respond!(db(storage.delete_user(user_id).await)) {
        return Ok(not_found(ErrorCode::UserNotFound, "Utilisateur introuvable"));
    }
    forget_session(request, user_id).await;

    tracing::info!("User {} deleted by admin {}", user_id, admin.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Compte supprimé")))
}
