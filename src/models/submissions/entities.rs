use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rendu d'un élève pour un devoir ; figé une fois corrigé
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    #[serde(rename = "devoir_id")]
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub file_token: Option<String>,
    pub grade: Option<f64>,
    pub comment: Option<String>,
    /// `corrige` côté client
    pub is_graded: bool,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Contenu d'un rendu à enregistrer
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub file_token: Option<String>,
}

/// Issue d'une correction conditionnelle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeOutcome<T> {
    Graded(T),
    AlreadyGraded,
    NotFound,
}
