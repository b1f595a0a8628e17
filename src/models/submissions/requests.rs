use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CreateSubmissionRequest {
    #[serde(rename = "devoir_id")]
    pub assignment_id: i64,
    pub content: Option<String>,
    pub file_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct UpdateSubmissionRequest {
    pub content: Option<String>,
    pub file_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub grade: f64,
    pub comment: Option<String>,
}
