//! États d'un quiz pour un élève.
//!
//! L'état n'est jamais stocké : il est recalculé à chaque lecture à partir de
//! l'horloge, des dates du quiz et de la réponse éventuelle de l'élève.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{Quiz, QuizResponse};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub enum QuizState {
    NotYetOpen,
    Open,
    Answered,
    Expired,
    Graded,
}

impl QuizState {
    /// Une réponse prime sur le calendrier : un quiz répondu reste `answered`
    /// (ou `graded`) après la date limite.
    pub fn derive(now: DateTime<Utc>, quiz: &Quiz, response: Option<&QuizResponse>) -> Self {
        match response {
            Some(r) if r.is_graded => QuizState::Graded,
            Some(_) => QuizState::Answered,
            None if now < quiz.starts_at => QuizState::NotYetOpen,
            None if now > quiz.deadline => QuizState::Expired,
            None => QuizState::Open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quizzes::entities::{GradingMode, QuizAnswer, QuizQuestion};
    use chrono::Duration;

    fn quiz(now: DateTime<Utc>) -> Quiz {
        Quiz {
            id: 1,
            teacher_id: 2,
            class_id: 3,
            subject_id: 4,
            title: "Fractions".into(),
            description: None,
            starts_at: now,
            deadline: now + Duration::hours(1),
            grading_mode: GradingMode::Auto,
            scale: 1.0,
            questions: vec![QuizQuestion::VraiFaux {
                prompt: "1/2 = 0,5".into(),
                points: 1.0,
                correct: true,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    fn response(is_graded: bool, now: DateTime<Utc>) -> QuizResponse {
        QuizResponse {
            id: 1,
            quiz_id: 1,
            student_id: 9,
            answers: vec![QuizAnswer::VraiFaux { value: true }],
            auto_score: 1.0,
            final_grade: is_graded.then_some(1.0),
            is_graded,
            graded_by: None,
            graded_at: None,
            submitted_at: now,
        }
    }

    #[test]
    fn test_calendar_states() {
        let t0 = Utc::now();
        let q = quiz(t0);
        assert_eq!(QuizState::derive(t0 - Duration::seconds(1), &q, None), QuizState::NotYetOpen);
        assert_eq!(QuizState::derive(t0, &q, None), QuizState::Open);
        assert_eq!(QuizState::derive(q.deadline, &q, None), QuizState::Open);
        assert_eq!(
            QuizState::derive(q.deadline + Duration::seconds(1), &q, None),
            QuizState::Expired
        );
    }

    #[test]
    fn test_response_overrides_calendar() {
        let t0 = Utc::now();
        let q = quiz(t0);
        let late = q.deadline + Duration::days(3);
        assert_eq!(
            QuizState::derive(late, &q, Some(&response(false, t0))),
            QuizState::Answered
        );
        assert_eq!(
            QuizState::derive(late, &q, Some(&response(true, t0))),
            QuizState::Graded
        );
    }
}
