use super::entities::{Assignment, AssignmentStatus};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

/// Devoir vu par un élève
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentAssignmentItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub status: AssignmentStatus,
    pub submission_id: Option<i64>,
    pub grade: Option<f64>,
}

/// Devoir vu par son auteur ou l'administration
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct TeacherAssignmentItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub student_count: i64,
    pub submission_count: i64,
    pub graded_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentAssignmentListResponse {
    pub items: Vec<StudentAssignmentItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct TeacherAssignmentListResponse {
    pub items: Vec<TeacherAssignmentItem>,
    pub pagination: PaginationInfo,
}
