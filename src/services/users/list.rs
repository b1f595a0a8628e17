use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, users::requests::UserListQuery};
use crate::services::guards::db;

pub async fn list_users(
    service: &UserService,
    query: UserListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let users = try_respond!(db(storage.list_users_with_pagination(query).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success(users, "Liste des comptes")))
}
