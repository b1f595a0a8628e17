use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{entities::NewSubmission, requests::CreateSubmissionRequest},
};
use crate::services::assignments::load_assignment;
use crate::services::guards::{
    bad_request, blank_to_none, current_user, ensure_file_owned, forbidden, written,
};

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    payload: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let assignment = try_respond!(load_assignment(&storage, payload.assignment_id).await);

    if !user.is_eleve() || user.class_id != Some(assignment.class_id) {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Ce devoir ne concerne pas votre classe",
        ));
    }
    if assignment.is_past_due(chrono::Utc::now()) {
        return Ok(forbidden(
            ErrorCode::DeadlinePassed,
            "La date limite est dépassée",
        ));
    }

    let content = blank_to_none(payload.content);
    let file_token = blank_to_none(payload.file_token);
    if let Err(msg) = assignment
        .submission_type
        .check(content.as_deref(), file_token.as_deref())
    {
        return Ok(bad_request(ErrorCode::InvalidSubmissionContent, msg));
    }
    try_respond!(ensure_file_owned(&storage, user.id, file_token.as_deref()).await);

    let submission = try_respond!(written(
        storage
            .create_submission(NewSubmission {
                assignment_id: assignment.id,
                student_id: user.id,
                content,
                file_token,
            })
            .await,
        ErrorCode::DuplicateSubmission,
    ));
    tracing::info!(
        "Student {} submitted assignment {}",
        user.id,
        assignment.id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(submission, "Devoir rendu")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::request_as;
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    fn text(assignment_id: i64, content: &str) -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            assignment_id,
            content: Some(content.into()),
            file_token: None,
        }
    }

    #[tokio::test]
    async fn test_submit_once() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.student);
        let service = SubmissionService::new_lazy();

        let resp = create_submission(&service, &req, text(f.assignment.id, "Ma rédaction"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = create_submission(&service, &req, text(f.assignment.id, "Encore"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_rejects_empty_text_and_strangers() {
        let f = fixture().await;
        let storage = f.shared();
        let service = SubmissionService::new_lazy();

        let resp = create_submission(
            &service,
            &request_as(&storage, &f.student),
            text(f.assignment.id, "   "),
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = create_submission(
            &service,
            &request_as(&storage, &f.prof),
            text(f.assignment.id, "Copie"),
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_deadline_passed() {
        let f = fixture().await;
        f.storage
            .update_assignment_impl(
                f.assignment.id,
                crate::models::assignments::requests::UpdateAssignmentRequest {
                    due_date: Some(chrono::Utc::now() - chrono::Duration::hours(1)),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        let storage = f.shared();
        let resp = create_submission(
            &SubmissionService::new_lazy(),
            &request_as(&storage, &f.student),
            text(f.assignment.id, "Trop tard"),
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
