use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::{AssignmentService, with_progress};
use crate::models::{
    ApiResponse, PaginationInfo,
    assignments::{
        entities::AssignmentStatus,
        requests::{AssignmentListParams, AssignmentListQuery},
        responses::{
            StudentAssignmentItem, StudentAssignmentListResponse, TeacherAssignmentListResponse,
        },
    },
    users::entities::UserRole,
};
use crate::services::guards::{current_user, db};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    params: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let mut query = AssignmentListQuery {
        page: params.page,
        size: params.size,
        teacher_id: None,
        class_id: params.class_id,
        subject_id: params.subject_id,
    };

    if user.role == UserRole::Eleve {
        let Some(class_id) = user.class_id else {
            return Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentAssignmentListResponse {
                    items: Vec::new(),
                    pagination: PaginationInfo::new(1, 0, 0, 0),
                },
                "Liste des devoirs",
            )));
        };
        query.class_id = Some(class_id);
        let page = try_respond!(db(storage.list_assignments_with_pagination(query).await));

        let ids: Vec<i64> = page.items.iter().map(|a| a.id).collect();
        let submissions: HashMap<i64, _> = try_respond!(db(storage
            .list_student_submissions_for(user.id, &ids)
            .await))
        .into_iter()
        .map(|s| (s.assignment_id, s))
        .collect();

        let now = chrono::Utc::now();
        let items = page
            .items
            .into_iter()
            .map(|assignment| {
                let submission = submissions.get(&assignment.id);
                StudentAssignmentItem {
                    status: AssignmentStatus::derive(now, &assignment, submission),
                    submission_id: submission.map(|s| s.id),
                    // la note n'est visible qu'une fois la copie corrigée
                    grade: submission.filter(|s| s.is_graded).and_then(|s| s.grade),
                    assignment,
                }
            })
            .collect();

        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentAssignmentListResponse {
                items,
                pagination: page.pagination,
            },
            "Liste des devoirs",
        )));
    }

    if user.role == UserRole::Prof {
        query.teacher_id = Some(user.id);
    }
    let page = try_respond!(db(storage.list_assignments_with_pagination(query).await));
    let items = try_respond!(with_progress(&storage, page.items).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TeacherAssignmentListResponse {
            items,
            pagination: page.pagination,
        },
        "Liste des devoirs",
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
    async fn test_student_and_teacher_views() {
        let f = fixture().await;
        f.storage
            .create_submission_impl(NewSubmission {
                assignment_id: f.assignment.id,
                student_id: f.student.id,
                content: Some("Ma rédaction".into()),
                file_token: None,
            })
            .await
            .expect("submission");
        let storage = f.shared();
        let service = AssignmentService::new_lazy();

        let resp = list_assignments(
            &service,
            &request_as(&storage, &f.student),
            AssignmentListParams::default(),
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp);
        assert_eq!(body["data"]["items"][0]["status"], "rendu");
        assert!(body["data"]["items"][0]["grade"].is_null());

        let resp = list_assignments(
            &service,
            &request_as(&storage, &f.prof),
            AssignmentListParams::default(),
        )
        .await
        .expect("response");
        let body = body_json(resp);
        assert_eq!(body["data"]["items"][0]["submission_count"], 1);
        assert_eq!(body["data"]["items"][0]["graded_count"], 0);
        assert_eq!(body["data"]["items"][0]["student_count"], 1);
    }
}
