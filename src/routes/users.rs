use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{
    CreateUserRequest, CredentialSheetQuery, UpdateUserRequest, UserListQuery,
};
use crate::services::UserService;
use crate::utils::SafeIDI64;

static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListQuery>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn create_user(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_user(user_data.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user_id.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    user_id: SafeIDI64,
    update_data: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_user(user_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(user_id.0, &req).await
}

pub async fn regenerate_credentials(
    req: HttpRequest,
    user_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.regenerate_credentials(user_id.0, &req).await
}

pub async fn credential_sheet(
    req: HttpRequest,
    query: web::Query<CredentialSheetQuery>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.credential_sheet(query.into_inner(), &req).await
}

pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            // avant `/{id}` pour ne pas être pris pour un identifiant
            .route("/credentials", web::get().to(credential_sheet))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user))
            .route("/{id}/credentials", web::post().to(regenerate_credentials)),
    );
}
