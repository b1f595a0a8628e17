use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuizService, checked_draft, load_quiz};
use crate::models::{
    ApiResponse, ErrorCode,
    quizzes::{entities::QuizDraft, requests::UpdateQuizRequest},
};
use crate::services::guards::{
    blank_to_none, clean_title, conflict, current_user, db, ensure_author, found,
};

/// Un quiz n'est modifiable que tant qu'aucun élève n'y a répondu
pub async fn update_quiz(
    service: &QuizService,
    request: &HttpRequest,
    quiz_id: i64,
    payload: UpdateQuizRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let quiz = try_respond!(load_quiz(&storage, quiz_id).await);
    try_respond!(ensure_author(&user, quiz.teacher_id));

    let progress = try_respond!(db(storage.quiz_progress(&[quiz.id]).await));
    if progress.get(&quiz.id).is_some_and(|(answered, _)| *answered > 0) {
        return Ok(conflict(
            ErrorCode::QuizHasResponses,
            "Des élèves ont déjà répondu : le quiz ne peut plus être modifié",
        ));
    }

    let title = match payload.title {
        Some(title) => try_respond!(clean_title(&title)),
        None => quiz.title,
    };
    let description = match payload.description {
        Some(description) => blank_to_none(Some(description)),
        None => quiz.description,
    };
    let draft = try_respond!(checked_draft(QuizDraft {
        teacher_id: quiz.teacher_id,
        class_id: quiz.class_id,
        subject_id: quiz.subject_id,
        title,
        description,
        starts_at: payload.date_debut.unwrap_or(quiz.starts_at),
        deadline: payload.date_limite.unwrap_or(quiz.deadline),
        grading_mode: payload.grading_mode.unwrap_or(quiz.grading_mode),
        scale: payload.scale.unwrap_or(quiz.scale),
        questions: payload.questions.unwrap_or(quiz.questions),
    }));

    let updated = try_respond!(found(
        storage.update_quiz(quiz.id, draft).await,
        ErrorCode::QuizNotFound,
        "Quiz introuvable",
    ));
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Quiz mis à jour")))
}

/// Les réponses des élèves sont supprimées avec le quiz
pub async fn delete_quiz(
    service: &QuizService,
    request: &HttpRequest,
    quiz_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let quiz = try_respond!(load_quiz(&storage, quiz_id).await);
    try_respond!(ensure_author(&user, quiz.teacher_id));

    try_respond!(db(storage.delete_quiz(quiz.id).await));
    tracing::info!("Quiz {} deleted by {}", quiz.id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Quiz supprimé")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quizzes::entities::{NewQuizResponse, QuizAnswer};
    use crate::services::quizzes::create::create_quiz;
    use crate::services::test_support::{body_json, request_as};
    use crate::services::quizzes::test_support::auto_quiz;
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_update_locked_after_first_response() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.prof);
        let service = QuizService::new_lazy();
        let created = create_quiz(&service, &req, auto_quiz(f.class.id, f.subject.id))
            .await
            .expect("response");
        let quiz_id = body_json(created)["data"]["id"].as_i64().expect("id");

        let resp = update_quiz(
            &service,
            &req,
            quiz_id,
            UpdateQuizRequest {
                title: Some("Conjugaison (corrigé)".into()),
                ..Default::default()
            },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);

        storage
            .create_quiz_response(NewQuizResponse {
                quiz_id,
                student_id: f.student.id,
                answers: vec![
                    QuizAnswer::Qcm { selected: vec![1] },
                    QuizAnswer::VraiFaux { value: true },
                ],
                auto_score: 20.0,
                final_grade: Some(20.0),
            })
            .await
            .expect("response stored");

        let resp = update_quiz(
            &service,
            &req,
            quiz_id,
            UpdateQuizRequest {
                scale: Some(10.0),
                ..Default::default()
            },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
