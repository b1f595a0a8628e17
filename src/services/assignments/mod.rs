pub mod create;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::assignments::{
    entities::Assignment,
    requests::{AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest},
    responses::TeacherAssignmentItem,
};
use crate::models::ErrorCode;
use crate::services::guards::{Guarded, bad_request, db, found};
use crate::storage::Storage;

declare_service!(AssignmentService);

impl AssignmentService {
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        params: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, params).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        payload: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, payload).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        payload: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, payload).await
    }

    /// Les soumissions du devoir partent avec lui
    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        update::delete_assignment(self, request, assignment_id).await
    }
}

pub(crate) async fn load_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
) -> Guarded<Assignment> {
    found(
        storage.get_assignment_by_id(assignment_id).await,
        ErrorCode::AssignmentNotFound,
        "Devoir introuvable",
    )
}

pub(crate) fn check_max_grade(max_grade: f64) -> Guarded<()> {
    if !max_grade.is_finite() || max_grade <= 0.0 {
        return Err(bad_request(
            ErrorCode::ValidationFailed,
            "La note maximale doit être strictement positive",
        ));
    }
    Ok(())
}

pub(crate) fn check_due_date(due_date: chrono::DateTime<chrono::Utc>) -> Guarded<()> {
    if due_date <= chrono::Utc::now() {
        return Err(bad_request(
            ErrorCode::InvalidDateRange,
            "La date limite doit être dans le futur",
        ));
    }
    Ok(())
}

/// Devoirs avec leurs compteurs de rendus, de corrections et d'élèves
pub(crate) async fn with_progress(
    storage: &Arc<dyn Storage>,
    assignments: Vec<Assignment>,
) -> Guarded<Vec<TeacherAssignmentItem>> {
    let ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
    let progress = db(storage.assignment_progress(&ids).await)?;

    let mut class_sizes: HashMap<i64, i64> = HashMap::new();
    for assignment in &assignments {
        if !class_sizes.contains_key(&assignment.class_id) {
            let count = db(storage.count_students_in_class(assignment.class_id).await)?;
            class_sizes.insert(assignment.class_id, count);
        }
    }

    Ok(assignments
        .into_iter()
        .map(|assignment| {
            let (submission_count, graded_count) =
                progress.get(&assignment.id).copied().unwrap_or((0, 0));
            TeacherAssignmentItem {
                student_count: class_sizes.get(&assignment.class_id).copied().unwrap_or(0),
                submission_count,
                graded_count,
                assignment,
            }
        })
        .collect())
}
