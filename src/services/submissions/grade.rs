use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, load_submission};
use crate::models::{
    ApiResponse, ErrorCode,
    quizzes::grading::grade_in_range,
    submissions::{entities::GradeOutcome, requests::GradeSubmissionRequest},
};
use crate::services::assignments::load_assignment;
use crate::services::guards::{
    bad_request, blank_to_none, conflict, current_user, db, ensure_author, not_found,
};

/// Correction définitive : une copie corrigée ne peut plus l'être à nouveau
pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    payload: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let submission = try_respond!(load_submission(&storage, submission_id).await);
    let assignment = try_respond!(load_assignment(&storage, submission.assignment_id).await);
    try_respond!(ensure_author(&user, assignment.teacher_id));

    if !grade_in_range(payload.grade, assignment.max_grade) {
        return Ok(bad_request(
            ErrorCode::GradeOutOfRange,
            format!("La note doit être comprise entre 0 et {}", assignment.max_grade),
        ));
    }

    let outcome = try_respond!(db(storage
        .grade_submission(
            submission.id,
            payload.grade,
            blank_to_none(payload.comment),
            user.id,
        )
        .await));
    match outcome {
        GradeOutcome::Graded(graded) => {
            tracing::info!("Submission {} graded by {}", graded.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(graded, "Copie corrigée")))
        }
        GradeOutcome::AlreadyGraded => Ok(conflict(
            ErrorCode::AlreadyGraded,
            "Cette soumission a déjà été corrigée",
        )),
        GradeOutcome::NotFound => Ok(not_found(
            ErrorCode::SubmissionNotFound,
            "Soumission introuvable",
        )),
    }
}
