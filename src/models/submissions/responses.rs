use super::entities::Submission;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub student_first_name: String,
    pub student_last_name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionWithStudent>,
}

/// Rendu d'un élève avec le titre du devoir (« mes rendus »)
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct MySubmissionItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub assignment_title: String,
    pub max_grade: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct MySubmissionListResponse {
    pub items: Vec<MySubmissionItem>,
}
