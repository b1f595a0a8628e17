use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AssignmentService;
use crate::utils::SafeIDI64;

static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(&req, query.into_inner())
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    payload: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, payload.into_inner())
        .await
}

pub async fn get_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, id.0).await
}

pub async fn update_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, id.0, payload.into_inner())
        .await
}

pub async fn delete_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.delete_assignment(&req, id.0).await
}

pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/devoirs")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_assignments)).route(
                    web::post()
                        .to(create_assignment)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            ),
    );
}
