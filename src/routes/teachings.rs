use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::teachings::requests::{CreateTeachingRequest, TeachingListQuery};
use crate::models::users::entities::UserRole;
use crate::services::TeachingService;
use crate::utils::SafeIDI64;

static TEACHING_SERVICE: Lazy<TeachingService> = Lazy::new(TeachingService::new_lazy);

pub async fn list_teachings(
    req: HttpRequest,
    query: web::Query<TeachingListQuery>,
) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE
        .list_teachings(&req, query.into_inner())
        .await
}

pub async fn create_teaching(
    req: HttpRequest,
    payload: web::Json<CreateTeachingRequest>,
) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE
        .create_teaching(&req, payload.into_inner())
        .await
}

pub async fn delete_teaching(req: HttpRequest, teaching_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE.delete_teaching(&req, teaching_id.0).await
}

pub async fn my_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE.my_classes(&req).await
}

pub async fn my_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHING_SERVICE.my_subjects(&req).await
}

pub fn configure_teachings_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/enseignements")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_teachings))
            .route("", web::post().to(create_teaching))
            .route("/{id}", web::delete().to(delete_teaching)),
    )
    .service(
        web::scope("/api/prof")
            .wrap(middlewares::RequireRole::new_any(UserRole::prof_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/classes", web::get().to(my_classes))
            .route("/matieres", web::get().to(my_subjects)),
    );
}
