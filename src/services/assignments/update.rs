use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, check_due_date, check_max_grade, load_assignment};
use crate::models::{
    ApiResponse, ErrorCode, assignments::requests::UpdateAssignmentRequest,
    quizzes::grading::POINT_EPSILON,
};
use crate::services::guards::{clean_title, conflict, current_user, db, ensure_author, found};

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    mut payload: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    if let Some(title) = &payload.title {
        payload.title = Some(try_respond!(clean_title(title)));
    }
    if let Some(due_date) = payload.due_date {
        try_respond!(check_due_date(due_date));
    }
    if let Some(max_grade) = payload.max_grade {
        try_respond!(check_max_grade(max_grade));
    }

    let storage = service.get_storage(request)?;
    let assignment = try_respond!(load_assignment(&storage, assignment_id).await);
    try_respond!(ensure_author(&user, assignment.teacher_id));

    // les notes déjà attribuées l'ont été sur l'ancien barème
    if let Some(max_grade) = payload.max_grade
        && (max_grade - assignment.max_grade).abs() > POINT_EPSILON
        && try_respond!(db(storage.count_graded_submissions(assignment.id).await)) > 0
    {
        return Ok(conflict(
            ErrorCode::AlreadyGraded,
            "Des copies sont déjà corrigées : la note maximale ne peut plus changer",
        ));
    }

    let assignment = try_respond!(found(
        storage.update_assignment(assignment.id, payload).await,
        ErrorCode::AssignmentNotFound,
        "Devoir introuvable",
    ));
    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "Devoir mis à jour")))
}

pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let assignment = try_respond!(load_assignment(&storage, assignment_id).await);
    try_respond!(ensure_author(&user, assignment.teacher_id));

    try_respond!(db(storage.delete_assignment(assignment.id).await));
    tracing::info!("Assignment {} deleted by {}", assignment.id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Devoir supprimé")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::NewSubmission;
    use crate::services::test_support::request_as;
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_max_grade_locked_once_graded() {
        let f = fixture().await;
        let submission = f
            .storage
            .create_submission_impl(NewSubmission {
                assignment_id: f.assignment.id,
                student_id: f.student.id,
                content: Some("Texte".into()),
                file_token: None,
            })
            .await
            .expect("submission");
        f.storage
            .grade_submission_impl(submission.id, 15.0, None, f.prof.id)
            .await
            .expect("grade");
        let storage = f.shared();
        let req = request_as(&storage, &f.prof);
        let service = AssignmentService::new_lazy();

        let resp = update_assignment(
            &service,
            &req,
            f.assignment.id,
            UpdateAssignmentRequest {
                max_grade: Some(10.0),
                ..Default::default()
            },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = update_assignment(
            &service,
            &req,
            f.assignment.id,
            UpdateAssignmentRequest {
                title: Some("Rédaction (v2)".into()),
                ..Default::default()
            },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_only_author_or_admin_deletes() {
        let f = fixture().await;
        let storage = f.shared();
        let service = AssignmentService::new_lazy();

        let resp = delete_assignment(&service, &request_as(&storage, &f.student), f.assignment.id)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = delete_assignment(&service, &request_as(&storage, &f.admin), f.assignment.id)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
