use serde::Serialize;
use ts_rs::TS;

use super::entities::{GradingMode, PublicQuizQuestion, Quiz, QuizQuestion, QuizResponse};
use super::lifecycle::QuizState;

/// Quiz vu par son auteur ou l'administration
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct TeacherQuizItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub quiz: Quiz,
    pub response_count: i64,
    pub graded_count: i64,
}

/// Quiz vu par un élève : les bonnes réponses ne sont révélées qu'une fois
/// la copie corrigée et la date limite passée
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct StudentQuizView {
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date_debut: chrono::DateTime<chrono::Utc>,
    pub date_limite: chrono::DateTime<chrono::Utc>,
    pub grading_mode: GradingMode,
    pub scale: f64,
    pub state: QuizState,
    pub questions: Vec<PublicQuizQuestion>,
    pub correction: Option<Vec<QuizQuestion>>,
    pub response: Option<QuizResponse>,
}

impl StudentQuizView {
    pub fn build(now: chrono::DateTime<chrono::Utc>, quiz: Quiz, response: Option<QuizResponse>) -> Self {
        let state = QuizState::derive(now, &quiz, response.as_ref());
        let questions = quiz.questions.iter().map(QuizQuestion::redacted).collect();
        // en correction automatique la copie est notée dès l'envoi, quiz encore ouvert
        let correction =
            (state == QuizState::Graded && now > quiz.deadline).then(|| quiz.questions.clone());
        Self {
            id: quiz.id,
            teacher_id: quiz.teacher_id,
            class_id: quiz.class_id,
            subject_id: quiz.subject_id,
            title: quiz.title,
            description: quiz.description,
            date_debut: quiz.starts_at,
            date_limite: quiz.deadline,
            grading_mode: quiz.grading_mode,
            scale: quiz.scale,
            state,
            questions,
            correction,
            response,
        }
    }
}

/// Ligne de la liste des quiz d'un élève
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct StudentQuizItem {
    pub id: i64,
    pub subject_id: i64,
    pub title: String,
    pub date_debut: chrono::DateTime<chrono::Utc>,
    pub date_limite: chrono::DateTime<chrono::Utc>,
    pub scale: f64,
    pub question_count: usize,
    pub state: QuizState,
    pub final_grade: Option<f64>,
}

impl StudentQuizItem {
    pub fn build(now: chrono::DateTime<chrono::Utc>, quiz: &Quiz, response: Option<&QuizResponse>) -> Self {
        let state = QuizState::derive(now, quiz, response);
        Self {
            id: quiz.id,
            subject_id: quiz.subject_id,
            title: quiz.title.clone(),
            date_debut: quiz.starts_at,
            date_limite: quiz.deadline,
            scale: quiz.scale,
            question_count: quiz.questions.len(),
            state,
            // note visible seulement une fois la copie corrigée
            final_grade: response.filter(|r| r.is_graded).and_then(|r| r.final_grade),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizResponseWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub response: QuizResponse,
    pub student_first_name: String,
    pub student_last_name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizResponseListResponse {
    pub items: Vec<QuizResponseWithStudent>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct TeacherQuizListResponse {
    pub items: Vec<TeacherQuizItem>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct StudentQuizListResponse {
    pub items: Vec<StudentQuizItem>,
}
