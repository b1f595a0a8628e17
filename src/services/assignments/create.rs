use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, check_due_date, check_max_grade};
use crate::models::{ApiResponse, assignments::requests::CreateAssignmentRequest};
use crate::services::guards::{
    blank_to_none, clean_title, current_user, db, ensure_class_and_subject, ensure_teaches,
};

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    mut payload: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    payload.title = try_respond!(clean_title(&payload.title));
    payload.description = blank_to_none(payload.description);
    try_respond!(check_due_date(payload.due_date));
    if let Some(max_grade) = payload.max_grade {
        try_respond!(check_max_grade(max_grade));
    }

    let storage = service.get_storage(request)?;
    try_respond!(ensure_class_and_subject(&storage, payload.class_id, payload.subject_id).await);
    try_respond!(ensure_teaches(&storage, &user, payload.class_id, Some(payload.subject_id)).await);

    let assignment = try_respond!(db(storage.create_assignment(user.id, payload).await));
    tracing::info!(
        "Assignment {} created by {} for class {}",
        assignment.id,
        user.id,
        assignment.class_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "Devoir publié")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::SubmissionType;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    fn payload(class_id: i64, subject_id: i64, days: i64) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            class_id,
            subject_id,
            title: "Exposé".into(),
            description: Some("  ".into()),
            due_date: chrono::Utc::now() + chrono::Duration::days(days),
            submission_type: SubmissionType::Fichier,
            max_grade: None,
        }
    }

    #[tokio::test]
    async fn test_create_assignment_defaults_and_deadline() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.prof);
        let service = AssignmentService::new_lazy();

        let resp = create_assignment(&service, &req, payload(f.class.id, f.subject.id, 3))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp);
        assert_eq!(body["data"]["max_grade"], 20.0);
        assert!(body["data"]["description"].is_null());

        let resp = create_assignment(&service, &req, payload(f.class.id, f.subject.id, -1))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let mut zero = payload(f.class.id, f.subject.id, 3);
        zero.max_grade = Some(0.0);
        let resp = create_assignment(&service, &req, zero).await.expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_student_cannot_publish() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.student);
        let resp = create_assignment(
            &AssignmentService::new_lazy(),
            &req,
            payload(f.class.id, f.subject.id, 3),
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
