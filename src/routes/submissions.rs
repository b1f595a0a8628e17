use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest, UpdateSubmissionRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn create_submission(
    req: HttpRequest,
    payload: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, payload.into_inner())
        .await
}

pub async fn update_submission(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<UpdateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .update_submission(&req, id.0, payload.into_inner())
        .await
}

pub async fn get_submission(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(&req, id.0).await
}

pub async fn list_for_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_for_assignment(&req, id.0).await
}

pub async fn list_mine(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_mine(&req).await
}

pub async fn grade_submission(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(&req, id.0, payload.into_inner())
        .await
}

pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    let eleve_only = || middlewares::RequireRole::new_any(UserRole::eleve_roles());
    let staff_only = || middlewares::RequireRole::new_any(UserRole::staff_roles());

    cfg.service(
        web::scope("/api/soumissions")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::post().to(create_submission).wrap(eleve_only())))
            .service(web::resource("/mine").route(web::get().to(list_mine).wrap(eleve_only())))
            .service(
                web::resource("/devoir/{id}")
                    .route(web::get().to(list_for_assignment).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_submission))
                    .route(web::put().to(update_submission).wrap(eleve_only())),
            )
            .service(
                web::resource("/{id}/grade")
                    .route(web::post().to(grade_submission).wrap(staff_only())),
            ),
    );
}
