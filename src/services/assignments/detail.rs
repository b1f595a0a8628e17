use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment, with_progress};
use crate::models::{
    ApiResponse,
    assignments::{entities::AssignmentStatus, responses::StudentAssignmentItem},
    users::entities::UserRole,
};
use crate::services::guards::{current_user, db, ensure_class_reader};

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let assignment = try_respond!(load_assignment(&storage, assignment_id).await);
    if assignment.teacher_id != user.id {
        try_respond!(ensure_class_reader(&storage, &user, assignment.class_id).await);
    }

    if user.role == UserRole::Eleve {
        let submission = try_respond!(db(storage
            .get_student_submission(assignment.id, user.id)
            .await));
        let item = StudentAssignmentItem {
            status: AssignmentStatus::derive(chrono::Utc::now(), &assignment, submission.as_ref()),
            submission_id: submission.as_ref().map(|s| s.id),
            grade: submission.filter(|s| s.is_graded).and_then(|s| s.grade),
            assignment,
        };
        return Ok(HttpResponse::Ok().json(ApiResponse::success(item, "Devoir")));
    }

    let mut items = try_respond!(with_progress(&storage, vec![assignment]).await);
    match items.pop() {
        Some(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item, "Devoir"))),
        None => Ok(crate::services::guards::internal_error(
            "Assignment progress",
            "empty result",
        )),
    }
}
