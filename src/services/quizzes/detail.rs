use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuizService, load_quiz};
use crate::models::{ApiResponse, quizzes::responses::StudentQuizView, users::entities::UserRole};
use crate::services::guards::{current_user, db, ensure_author, ensure_class_reader};

pub async fn get_quiz(
    service: &QuizService,
    request: &HttpRequest,
    quiz_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let quiz = try_respond!(load_quiz(&storage, quiz_id).await);

    if user.role == UserRole::Eleve {
        try_respond!(ensure_class_reader(&storage, &user, quiz.class_id).await);
        let response = try_respond!(db(storage.get_student_quiz_response(quiz.id, user.id).await));
        let view = StudentQuizView::build(chrono::Utc::now(), quiz, response);
        return Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Quiz")));
    }

    try_respond!(ensure_author(&user, quiz.teacher_id));
    Ok(HttpResponse::Ok().json(ApiResponse::success(quiz, "Quiz")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quizzes::create::create_quiz;
    use crate::services::quizzes::test_support::auto_quiz;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;

    #[tokio::test]
    async fn test_views_by_role() {
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

        let student = body_json(
            get_quiz(&service, &request_as(&storage, &f.student), quiz_id)
                .await
                .expect("response"),
        );
        assert!(student["data"]["questions"][0].get("correct").is_none());
        assert!(student["data"]["correction"].is_null());

        let author = body_json(
            get_quiz(&service, &request_as(&storage, &f.prof), quiz_id)
                .await
                .expect("response"),
        );
        assert_eq!(author["data"]["questions"][0]["correct"][0], 1);
    }
}
