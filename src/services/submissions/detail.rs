use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, load_submission};
use crate::models::ApiResponse;
use crate::services::assignments::load_assignment;
use crate::services::guards::{current_user, ensure_author};

/// Visible par l'élève qui l'a rendu, l'auteur du devoir et l'administration
pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let mut submission = try_respond!(load_submission(&storage, submission_id).await);

    if submission.student_id == user.id {
        if !submission.is_graded {
            submission.grade = None;
            submission.comment = None;
        }
    } else {
        let assignment = try_respond!(load_assignment(&storage, submission.assignment_id).await);
        try_respond!(ensure_author(&user, assignment.teacher_id));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Soumission")))
}
