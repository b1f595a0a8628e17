use actix_web::{HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// Le jeton d'accès expire seul ; seul le cookie de rafraîchissement est effacé
pub async fn handle_logout() -> ActixResult<HttpResponse> {
    let empty_cookie = JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::<()>::success_empty("Déconnexion réussie")))
}
