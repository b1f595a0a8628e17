use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::quizzes::requests::{
    CreateQuizRequest, GradeQuizResponseRequest, QuizListParams, SubmitQuizRequest,
    UpdateQuizRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::QuizService;
use crate::utils::SafeIDI64;

static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);

pub async fn list_quizzes(
    req: HttpRequest,
    query: web::Query<QuizListParams>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_quizzes(&req, query.into_inner()).await
}

pub async fn create_quiz(
    req: HttpRequest,
    payload: web::Json<CreateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.create_quiz(&req, payload.into_inner()).await
}

pub async fn get_quiz(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_quiz(&req, id.0).await
}

pub async fn update_quiz(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<UpdateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .update_quiz(&req, id.0, payload.into_inner())
        .await
}

pub async fn delete_quiz(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.delete_quiz(&req, id.0).await
}

pub async fn submit_answers(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<SubmitQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .submit_answers(&req, id.0, payload.into_inner())
        .await
}

pub async fn list_responses(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_responses(&req, id.0).await
}

pub async fn grade_response(
    req: HttpRequest,
    id: SafeIDI64,
    payload: web::Json<GradeQuizResponseRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .grade_response(&req, id.0, payload.into_inner())
        .await
}

pub fn configure_quizzes_routes(cfg: &mut web::ServiceConfig) {
    let staff_only = || middlewares::RequireRole::new_any(UserRole::staff_roles());

    cfg.service(
        web::scope("/api/quiz")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_quizzes))
                    .route(web::post().to(create_quiz).wrap(staff_only())),
            )
            .service(
                web::resource("/reponses/{id}/grade")
                    .route(web::post().to(grade_response).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_quiz))
                    .route(web::put().to(update_quiz).wrap(staff_only()))
                    .route(web::delete().to(delete_quiz).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}/reponses")
                    .route(web::get().to(list_responses).wrap(staff_only()))
                    .route(
                        web::post()
                            .to(submit_answers)
                            .wrap(middlewares::RequireRole::new_any(UserRole::eleve_roles())),
                    ),
            ),
    );
}
