use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{
    ApiResponse,
    submissions::responses::{MySubmissionListResponse, SubmissionListResponse},
};
use crate::services::assignments::load_assignment;
use crate::services::guards::{current_user, db, ensure_author};

/// Rendus d'un devoir, pour son auteur ou l'administration
pub async fn list_for_assignment(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let assignment = try_respond!(load_assignment(&storage, assignment_id).await);
    try_respond!(ensure_author(&user, assignment.teacher_id));

    let items = try_respond!(db(storage.list_submissions_by_assignment(assignment.id).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionListResponse { items },
        "Rendus du devoir",
    )))
}

pub async fn list_mine(
    service: &SubmissionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let mut items = try_respond!(db(storage.list_submissions_by_student(user.id).await));
    for item in items.iter_mut().filter(|i| !i.submission.is_graded) {
        item.submission.grade = None;
        item.submission.comment = None;
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MySubmissionListResponse { items },
        "Mes rendus",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::NewSubmission;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_lists_by_role() {
        let f = fixture().await;
        f.storage
            .create_submission_impl(NewSubmission {
                assignment_id: f.assignment.id,
                student_id: f.student.id,
                content: Some("Copie".into()),
                file_token: None,
            })
            .await
            .expect("submission");
        let storage = f.shared();
        let service = SubmissionService::new_lazy();

        let resp = list_for_assignment(&service, &request_as(&storage, &f.prof), f.assignment.id)
            .await
            .expect("response");
        let body = body_json(resp);
        assert_eq!(body["data"]["items"][0]["student_last_name"], f.student.last_name);

        let resp = list_for_assignment(&service, &request_as(&storage, &f.student), f.assignment.id)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = list_mine(&service, &request_as(&storage, &f.student))
            .await
            .expect("response");
        let body = body_json(resp);
        assert_eq!(body["data"]["items"][0]["assignment_title"], f.assignment.title);
    }
}
