use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuizService, checked_draft};
use crate::models::{
    ApiResponse,
    quizzes::{
        entities::QuizDraft,
        requests::{CreateQuizRequest, DEFAULT_QUIZ_SCALE},
    },
};
use crate::services::guards::{
    blank_to_none, clean_title, current_user, db, ensure_class_and_subject, ensure_teaches,
};

pub async fn create_quiz(
    service: &QuizService,
    request: &HttpRequest,
    payload: CreateQuizRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let draft = try_respond!(checked_draft(QuizDraft {
        teacher_id: user.id,
        class_id: payload.class_id,
        subject_id: payload.subject_id,
        title: try_respond!(clean_title(&payload.title)),
        description: blank_to_none(payload.description),
        starts_at: payload.date_debut,
        deadline: payload.date_limite,
        grading_mode: payload.grading_mode,
        scale: payload.scale.unwrap_or(DEFAULT_QUIZ_SCALE),
        questions: payload.questions,
    }));

    let storage = service.get_storage(request)?;
    try_respond!(ensure_class_and_subject(&storage, draft.class_id, draft.subject_id).await);
    try_respond!(ensure_teaches(&storage, &user, draft.class_id, Some(draft.subject_id)).await);

    let quiz = try_respond!(db(storage.create_quiz(draft).await));
    tracing::info!(
        "Quiz {} created by {} ({} questions)",
        quiz.id,
        user.id,
        quiz.questions.len()
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(quiz, "Quiz créé")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quizzes::entities::QuizQuestion;
    use crate::services::quizzes::test_support::{auto_quiz, manual_quiz};
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_create_quiz() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.prof);
        let service = QuizService::new_lazy();

        let resp = create_quiz(&service, &req, auto_quiz(f.class.id, f.subject.id))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp);
        assert_eq!(body["data"]["scale"], 20.0);
        assert_eq!(body["data"]["questions"][0]["kind"], "qcm");
    }

    #[tokio::test]
    async fn test_rejects_invalid_quizzes() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.prof);
        let service = QuizService::new_lazy();

        let mut budget = auto_quiz(f.class.id, f.subject.id);
        budget.scale = Some(15.0);
        let resp = create_quiz(&service, &req, budget).await.expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp)["code"],
            crate::models::ErrorCode::PointBudgetMismatch.as_i32()
        );

        let mut open_in_auto = manual_quiz(f.class.id, f.subject.id);
        open_in_auto.grading_mode = crate::models::quizzes::entities::GradingMode::Auto;
        let resp = create_quiz(&service, &req, open_in_auto).await.expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let mut one_option = auto_quiz(f.class.id, f.subject.id);
        one_option.questions[0] = QuizQuestion::Qcm {
            prompt: "Seul choix".into(),
            points: 12.0,
            options: vec!["a".into()],
            correct: vec![0],
        };
        let resp = create_quiz(&service, &req, one_option).await.expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
