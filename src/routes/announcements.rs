use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::announcements::requests::{AnnouncementListParams, CreateAnnouncementRequest};
use crate::models::users::entities::UserRole;
use crate::services::AnnouncementService;
use crate::utils::SafeIDI64;

static ANNOUNCEMENT_SERVICE: Lazy<AnnouncementService> = Lazy::new(AnnouncementService::new_lazy);

pub async fn list_announcements(
    req: HttpRequest,
    query: web::Query<AnnouncementListParams>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .list_announcements(&req, query.into_inner())
        .await
}

pub async fn create_announcement(
    req: HttpRequest,
    payload: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .create_announcement(&req, payload.into_inner())
        .await
}

pub async fn delete_announcement(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE.delete_announcement(&req, id.0).await
}

pub fn configure_announcements_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/avis")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_announcements))
                    .route(
                        web::post()
                            .to(create_announcement)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}").route(
                    web::delete()
                        .to(delete_announcement)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            ),
    );
}
