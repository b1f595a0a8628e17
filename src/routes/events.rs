use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::events::requests::{CreateEventRequest, EventListParams, UpdateEventRequest};
use crate::models::users::entities::UserRole;
use crate::services::EventService;
use crate::utils::SafeIDI64;

static EVENT_SERVICE: Lazy<EventService> = Lazy::new(EventService::new_lazy);

pub async fn list_events(
    req: HttpRequest,
    query: web::Query<EventListParams>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.list_events(&req, query.into_inner()).await
}

pub async fn create_event(
    req: HttpRequest,
    payload: web::Json<CreateEventRequest>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.create_event(&req, payload.into_inner()).await
}

pub async fn update_event(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<UpdateEventRequest>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE
        .update_event(&req, id.0, payload.into_inner())
        .await
}

pub async fn delete_event(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.delete_event(&req, id.0).await
}

pub fn configure_events_routes(cfg: &mut web::ServiceConfig) {
    let staff_only = || middlewares::RequireRole::new_any(UserRole::staff_roles());

    cfg.service(
        web::scope("/api/evenements")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_events))
                    .route(web::post().to(create_event).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_event).wrap(staff_only()))
                    .route(web::delete().to(delete_event).wrap(staff_only())),
            ),
    );
}
