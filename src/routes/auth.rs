use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::{ChangePasswordRequest, LoginRequest};
use crate::services::AuthService;

static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(login_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn logout() -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout().await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&request).await
}

pub async fn change_password(
    request: HttpRequest,
    change: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .change_password(&request, change.into_inner())
        .await
}

pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(middlewares::RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .route("/logout", web::post().to(logout))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(get_user))
                    .route("/password", web::put().to(change_password)),
            ),
    );
}
