use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuizService, load_quiz};
use crate::models::{
    ApiResponse, ErrorCode,
    quizzes::{
        entities::GradingMode,
        grading::grade_in_range,
        requests::GradeQuizResponseRequest,
        responses::QuizResponseListResponse,
    },
    submissions::entities::GradeOutcome,
};
use crate::services::guards::{
    bad_request, conflict, current_user, db, ensure_author, found, not_found,
};

pub async fn list_responses(
    service: &QuizService,
    request: &HttpRequest,
    quiz_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let quiz = try_respond!(load_quiz(&storage, quiz_id).await);
    try_respond!(ensure_author(&user, quiz.teacher_id));

    let items = try_respond!(db(storage.list_quiz_responses(quiz.id).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizResponseListResponse { items },
        "Réponses au quiz",
    )))
}

/// Note finale d'une réponse à un quiz manuel, saisie une seule fois
pub async fn grade_response(
    service: &QuizService,
    request: &HttpRequest,
    response_id: i64,
    payload: GradeQuizResponseRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let response = try_respond!(found(
        storage.get_quiz_response_by_id(response_id).await,
        ErrorCode::QuizResponseNotFound,
        "Réponse introuvable",
    ));
    let quiz = try_respond!(load_quiz(&storage, response.quiz_id).await);
    try_respond!(ensure_author(&user, quiz.teacher_id));

    if quiz.grading_mode != GradingMode::Manuel {
        return Ok(bad_request(
            ErrorCode::NotManualQuiz,
            "Ce quiz est corrigé automatiquement",
        ));
    }
    if !grade_in_range(payload.grade, quiz.scale) {
        return Ok(bad_request(
            ErrorCode::GradeOutOfRange,
            format!("La note doit être comprise entre 0 et {}", quiz.scale),
        ));
    }

    match try_respond!(db(storage
        .grade_quiz_response(response.id, payload.grade, user.id)
        .await))
    {
        GradeOutcome::Graded(graded) => {
            tracing::info!("Quiz response {} graded by {}", graded.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(graded, "Réponse corrigée")))
        }
        GradeOutcome::AlreadyGraded => Ok(conflict(
            ErrorCode::AlreadyGraded,
            "Cette réponse a déjà été corrigée",
        )),
        GradeOutcome::NotFound => Ok(not_found(
            ErrorCode::QuizResponseNotFound,
            "Réponse introuvable",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quizzes::entities::QuizAnswer;
    use crate::models::quizzes::requests::SubmitQuizRequest;
    use crate::services::quizzes::create::create_quiz;
    use crate::services::quizzes::submit::submit_answers;
    use crate::services::quizzes::test_support::manual_quiz;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_manual_grading_flow() {
        let f = fixture().await;
        let storage = f.shared();
        let service = QuizService::new_lazy();
        let prof = request_as(&storage, &f.prof);
        let created = create_quiz(&service, &prof, manual_quiz(f.class.id, f.subject.id))
            .await
            .expect("response");
        let quiz_id = body_json(created)["data"]["id"].as_i64().expect("id");

        let submitted = submit_answers(
            &service,
            &request_as(&storage, &f.student),
            quiz_id,
            SubmitQuizRequest {
                answers: vec![
                    QuizAnswer::VraiFaux { value: true },
                    QuizAnswer::TexteLibre {
                        text: "Jean Valjean vole des chandeliers".into(),
                    },
                ],
            },
        )
        .await
        .expect("response");
        let body = body_json(submitted);
        assert_eq!(body["data"]["auto_score"], 4.0);
        assert_eq!(body["data"]["is_graded"], false);
        let response_id = body["data"]["id"].as_i64().expect("id");

        let listed = body_json(list_responses(&service, &prof, quiz_id).await.expect("response"));
        assert_eq!(listed["data"]["items"][0]["student_first_name"], f.student.first_name);

        let resp = grade_response(
            &service,
            &prof,
            response_id,
            GradeQuizResponseRequest { grade: 11.0 },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = grade_response(
            &service,
            &prof,
            response_id,
            GradeQuizResponseRequest { grade: 8.5 },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp)["data"]["final_grade"], 8.5);

        let resp = grade_response(
            &service,
            &prof,
            response_id,
            GradeQuizResponseRequest { grade: 9.0 },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
