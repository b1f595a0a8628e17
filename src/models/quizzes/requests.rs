use serde::Deserialize;
use ts_rs::TS;

use super::entities::{GradingMode, QuizAnswer, QuizQuestion};

pub const DEFAULT_QUIZ_SCALE: f64 = 20.0;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizListParams {
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct QuizListQuery {
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct CreateQuizRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date_debut: chrono::DateTime<chrono::Utc>,
    pub date_limite: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub grading_mode: GradingMode,
    /// Barème, 20 par défaut
    pub scale: Option<f64>,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_debut: Option<chrono::DateTime<chrono::Utc>>,
    pub date_limite: Option<chrono::DateTime<chrono::Utc>>,
    pub grading_mode: Option<GradingMode>,
    pub scale: Option<f64>,
    pub questions: Option<Vec<QuizQuestion>>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct SubmitQuizRequest {
    pub answers: Vec<QuizAnswer>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct GradeQuizResponseRequest {
    pub grade: f64,
}
