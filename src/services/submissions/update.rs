use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, load_submission};
use crate::models::{ApiResponse, ErrorCode, submissions::requests::UpdateSubmissionRequest};
use crate::services::assignments::load_assignment;
use crate::services::guards::{
    bad_request, blank_to_none, conflict, current_user, db, ensure_file_owned, forbidden,
};

/// Un rendu reste modifiable par son auteur jusqu'à la date limite, tant
/// qu'il n'est pas corrigé. Un champ absent est conservé, une chaîne vide l'efface.
pub async fn update_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    payload: UpdateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let submission = try_respond!(load_submission(&storage, submission_id).await);
    if submission.student_id != user.id {
        return Ok(forbidden(ErrorCode::Forbidden, "Accès refusé"));
    }
    if submission.is_graded {
        return Ok(conflict(
            ErrorCode::AlreadyGraded,
            "Cette soumission a déjà été corrigée",
        ));
    }

    let assignment = try_respond!(load_assignment(&storage, submission.assignment_id).await);
    if assignment.is_past_due(chrono::Utc::now()) {
        return Ok(forbidden(
            ErrorCode::DeadlinePassed,
            "La date limite est dépassée",
        ));
    }

    let content = match payload.content {
        Some(content) => blank_to_none(Some(content)),
        None => submission.content,
    };
    let file_token = match payload.file_token {
        Some(token) => blank_to_none(Some(token)),
        None => submission.file_token,
    };
    if let Err(msg) = assignment
        .submission_type
        .check(content.as_deref(), file_token.as_deref())
    {
        return Ok(bad_request(ErrorCode::InvalidSubmissionContent, msg));
    }
    try_respond!(ensure_file_owned(&storage, user.id, file_token.as_deref()).await);

    match try_respond!(db(storage
        .update_submission_content(submission.id, content, file_token)
        .await))
    {
        Some(updated) => Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Rendu modifié"))),
        // corrigée entre la lecture et l'écriture
        None => Ok(conflict(
            ErrorCode::AlreadyGraded,
            "Cette soumission a déjà été corrigée",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::NewSubmission;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_edit_until_graded() {
        let f = fixture().await;
        let submission = f
            .storage
            .create_submission_impl(NewSubmission {
                assignment_id: f.assignment.id,
                student_id: f.student.id,
                content: Some("Brouillon".into()),
                file_token: None,
            })
            .await
            .expect("submission");
        let storage = f.shared();
        let req = request_as(&storage, &f.student);
        let service = SubmissionService::new_lazy();

        let resp = update_submission(
            &service,
            &req,
            submission.id,
            UpdateSubmissionRequest {
                content: Some("Version finale".into()),
                file_token: None,
            },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp)["data"]["content"], "Version finale");

        f.storage
            .grade_submission_impl(submission.id, 12.0, None, f.prof.id)
            .await
            .expect("grade");
        let resp = update_submission(
            &service,
            &req,
            submission.id,
            UpdateSubmissionRequest {
                content: Some("Trop tard".into()),
                file_token: None,
            },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
