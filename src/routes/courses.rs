use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::SafeIDI64;

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    payload: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(&req, payload.into_inner())
        .await
}

pub async fn get_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeIDI64,
    payload: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(&req, course_id.0, payload.into_inner())
        .await
}

pub async fn delete_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&req, course_id.0).await
}

pub fn configure_courses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/cours")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_courses)).route(
                    web::post()
                        .to(create_course)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_course))
                    .route(
                        web::put()
                            .to(update_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            ),
    );
}
