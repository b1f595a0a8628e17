use serde::Deserialize;
use ts_rs::TS;

use super::entities::SubmissionType;

pub const DEFAULT_MAX_GRADE: f64 = 20.0;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
}

/// Filtres résolus par le service selon le rôle du lecteur
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub submission_type: SubmissionType,
    /// 20 par défaut
    pub max_grade: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub submission_type: Option<SubmissionType>,
    pub max_grade: Option<f64>,
}
