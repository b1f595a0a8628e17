use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::QuizService;
use crate::models::{
    ApiResponse,
    quizzes::{
        requests::{QuizListParams, QuizListQuery},
        responses::{
            StudentQuizItem, StudentQuizListResponse, TeacherQuizItem, TeacherQuizListResponse,
        },
    },
    users::entities::UserRole,
};
use crate::services::guards::{current_user, db};

pub async fn list_quizzes(
    service: &QuizService,
    request: &HttpRequest,
    params: QuizListParams,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let mut query = QuizListQuery {
        teacher_id: None,
        class_id: params.class_id,
        subject_id: params.subject_id,
    };

    if user.role == UserRole::Eleve {
        let Some(class_id) = user.class_id else {
            return Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentQuizListResponse { items: Vec::new() },
                "Liste des quiz",
            )));
        };
        query.class_id = Some(class_id);
        let quizzes = try_respond!(db(storage.list_quizzes(query).await));
        let ids: Vec<i64> = quizzes.iter().map(|q| q.id).collect();
        let responses: HashMap<i64, _> = try_respond!(db(storage
            .list_student_quiz_responses(user.id, &ids)
            .await))
        .into_iter()
        .map(|r| (r.quiz_id, r))
        .collect();

        let now = chrono::Utc::now();
        let items = quizzes
            .iter()
            .map(|quiz| StudentQuizItem::build(now, quiz, responses.get(&quiz.id)))
            .collect();
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentQuizListResponse { items },
            "Liste des quiz",
        )));
    }

    if user.role == UserRole::Prof {
        query.teacher_id = Some(user.id);
    }
    let quizzes = try_respond!(db(storage.list_quizzes(query).await));
    let ids: Vec<i64> = quizzes.iter().map(|q| q.id).collect();
    let progress = try_respond!(db(storage.quiz_progress(&ids).await));
    let items = quizzes
        .into_iter()
        .map(|quiz| {
            let (response_count, graded_count) =
                progress.get(&quiz.id).copied().unwrap_or((0, 0));
            TeacherQuizItem {
                quiz,
                response_count,
                graded_count,
            }
        })
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TeacherQuizListResponse { items },
        "Liste des quiz",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quizzes::create::create_quiz;
    use crate::services::quizzes::test_support::auto_quiz;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;

    #[tokio::test]
    async fn test_student_list_hides_answers() {
        let f = fixture().await;
        let storage = f.shared();
        let service = QuizService::new_lazy();
        create_quiz(
            &service,
            &request_as(&storage, &f.prof),
            auto_quiz(f.class.id, f.subject.id),
        )
        .await
        .expect("response");

        let resp = list_quizzes(
            &service,
            &request_as(&storage, &f.student),
            QuizListParams::default(),
        )
        .await
        .expect("response");
        let body = body_json(resp);
        let item = &body["data"]["items"][0];
        assert_eq!(item["state"], "open");
        assert_eq!(item["question_count"], 2);
        assert!(item.get("questions").is_none());

        let resp = list_quizzes(
            &service,
            &request_as(&storage, &f.prof),
            QuizListParams::default(),
        )
        .await
        .expect("response");
        assert_eq!(body_json(resp)["data"]["items"][0]["response_count"], 0);
    }
}
