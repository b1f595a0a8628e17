use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuizService, load_quiz};
use crate::models::{
    ApiResponse, ErrorCode,
    quizzes::{
        entities::{GradingMode, NewQuizResponse},
        grading::score_answers,
        lifecycle::QuizState,
        requests::SubmitQuizRequest,
    },
};
use crate::services::guards::{bad_request, conflict, current_user, db, forbidden, written};

/// Une seule réponse par élève, acceptée seulement pendant l'ouverture du quiz
pub async fn submit_answers(
    service: &QuizService,
    request: &HttpRequest,
    quiz_id: i64,
    payload: SubmitQuizRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let quiz = try_respond!(load_quiz(&storage, quiz_id).await);
    if !user.is_eleve() || user.class_id != Some(quiz.class_id) {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Ce quiz ne concerne pas votre classe",
        ));
    }

    let existing = try_respond!(db(storage.get_student_quiz_response(quiz.id, user.id).await));
    match QuizState::derive(chrono::Utc::now(), &quiz, existing.as_ref()) {
        QuizState::Open => {}
        QuizState::NotYetOpen => {
            return Ok(forbidden(
                ErrorCode::QuizNotOpen,
                "Le quiz n'est pas encore ouvert",
            ));
        }
        QuizState::Expired => {
            return Ok(forbidden(ErrorCode::QuizClosed, "Le quiz est clôturé"));
        }
        QuizState::Answered | QuizState::Graded => {
            return Ok(conflict(
                ErrorCode::QuizAlreadyAnswered,
                "Vous avez déjà répondu à ce quiz",
            ));
        }
    }

    let auto_score = match score_answers(&quiz.questions, &payload.answers) {
        Ok(score) => score,
        Err(err) => return Ok(bad_request(ErrorCode::InvalidAnswers, err.to_string())),
    };
    let final_grade = (quiz.grading_mode == GradingMode::Auto).then_some(auto_score);

    let response = try_respond!(written(
        storage
            .create_quiz_response(NewQuizResponse {
                quiz_id: quiz.id,
                student_id: user.id,
                answers: payload.answers,
                auto_score,
                final_grade,
            })
            .await,
        ErrorCode::QuizAlreadyAnswered,
    ));
    tracing::info!(
        "Student {} answered quiz {} (auto score {})",
        user.id,
        quiz.id,
        auto_score
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(response, "Réponses enregistrées")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quizzes::entities::QuizAnswer;
    use crate::services::quizzes::create::create_quiz;
    use crate::services::quizzes::test_support::{auto_quiz, manual_quiz};
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;
    use chrono::{Duration, Utc};

    fn answers() -> SubmitQuizRequest {
        SubmitQuizRequest {
            answers: vec![
                QuizAnswer::Qcm { selected: vec![1] },
                QuizAnswer::VraiFaux { value: false },
            ],
        }
    }

    #[tokio::test]
    async fn test_auto_quiz_graded_on_submit() {
        let f = fixture().await;
        let storage = f.shared();
        let service = QuizService::new_lazy();
        let created = create_quiz(
            &service,
            &request_as(&storage, &f.prof),
            auto_quiz(f.class.id, f.subject.id),
        )
        .await
        .expect("response");
        let quiz_id = body_json(created)["data"]["id"].as_i64().expect("id");
        let req = request_as(&storage, &f.student);

        let resp = submit_answers(&service, &req, quiz_id, answers())
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp);
        assert_eq!(body["data"]["auto_score"], 12.0);
        assert_eq!(body["data"]["final_grade"], 12.0);
        assert_eq!(body["data"]["is_graded"], true);

        let resp = submit_answers(&service, &req, quiz_id, answers())
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_calendar_and_shape_checks() {
        let f = fixture().await;
        let storage = f.shared();
        let service = QuizService::new_lazy();
        let prof = request_as(&storage, &f.prof);
        let student = request_as(&storage, &f.student);

        let mut later = manual_quiz(f.class.id, f.subject.id);
        later.date_debut = Utc::now() + Duration::days(1);
        later.date_limite = Utc::now() + Duration::days(2);
        let id = body_json(create_quiz(&service, &prof, later).await.expect("response"))["data"]
            ["id"]
            .as_i64()
            .expect("id");
        let resp = submit_answers(&service, &student, id, answers())
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let mut closed = manual_quiz(f.class.id, f.subject.id);
        closed.date_debut = Utc::now() - Duration::days(2);
        closed.date_limite = Utc::now() - Duration::days(1);
        let id = body_json(create_quiz(&service, &prof, closed).await.expect("response"))["data"]
            ["id"]
            .as_i64()
            .expect("id");
        let resp = submit_answers(&service, &student, id, answers())
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(resp)["message"], "Le quiz est clôturé");

        let open = manual_quiz(f.class.id, f.subject.id);
        let id = body_json(create_quiz(&service, &prof, open).await.expect("response"))["data"]
            ["id"]
            .as_i64()
            .expect("id");
        // le quiz manuel attend un vrai/faux puis un texte libre
        let resp = submit_answers(&service, &student, id, answers())
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
