use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::guards::found;

pub async fn get_user(
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
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Compte")))
}
