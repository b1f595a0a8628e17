pub mod create;
pub mod detail;
pub mod list;
pub mod responses;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::quizzes::{
    entities::{Quiz, QuizDraft},
    grading::{QuizValidationError, validate_quiz},
    requests::{
        CreateQuizRequest, GradeQuizResponseRequest, QuizListParams, SubmitQuizRequest,
        UpdateQuizRequest,
    },
};
use crate::services::guards::{Guarded, bad_request, found};
use crate::storage::Storage;

declare_service!(QuizService);

impl QuizService {
    pub async fn list_quizzes(
        &self,
        request: &HttpRequest,
        params: QuizListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_quizzes(self, request, params).await
    }

    pub async fn create_quiz(
        &self,
        request: &HttpRequest,
        payload: CreateQuizRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_quiz(self, request, payload).await
    }

    pub async fn get_quiz(&self, request: &HttpRequest, quiz_id: i64) -> ActixResult<HttpResponse> {
        detail::get_quiz(self, request, quiz_id).await
    }

    pub async fn update_quiz(
        &self,
        request: &HttpRequest,
        quiz_id: i64,
        payload: UpdateQuizRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_quiz(self, request, quiz_id, payload).await
    }

    pub async fn delete_quiz(
        &self,
        request: &HttpRequest,
        quiz_id: i64,
    ) -> ActixResult<HttpResponse> {
        update::delete_quiz(self, request, quiz_id).await
    }

    pub async fn submit_answers(
        &self,
        request: &HttpRequest,
        quiz_id: i64,
        payload: SubmitQuizRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_answers(self, request, quiz_id, payload).await
    }

    pub async fn list_responses(
        &self,
        request: &HttpRequest,
        quiz_id: i64,
    ) -> ActixResult<HttpResponse> {
        responses::list_responses(self, request, quiz_id).await
    }

    pub async fn grade_response(
        &self,
        request: &HttpRequest,
        response_id: i64,
        payload: GradeQuizResponseRequest,
    ) -> ActixResult<HttpResponse> {
        responses::grade_response(self, request, response_id, payload).await
    }
}

pub(crate) async fn load_quiz(storage: &Arc<dyn Storage>, quiz_id: i64) -> Guarded<Quiz> {
    found(
        storage.get_quiz_by_id(quiz_id).await,
        ErrorCode::QuizNotFound,
        "Quiz introuvable",
    )
}

/// Brouillon validé, ou 400 avec le code correspondant au défaut trouvé
pub(crate) fn checked_draft(draft: QuizDraft) -> Guarded<QuizDraft> {
    match validate_quiz(
        &draft.questions,
        draft.scale,
        draft.grading_mode,
        draft.starts_at,
        draft.deadline,
    ) {
        Ok(()) => Ok(draft),
        Err(err) => {
            let code = match err {
                QuizValidationError::PointBudgetMismatch { .. } => ErrorCode::PointBudgetMismatch,
                QuizValidationError::InvalidDates => ErrorCode::InvalidDateRange,
                QuizValidationError::InvalidScale => ErrorCode::ValidationFailed,
                _ => ErrorCode::InvalidQuestion,
            };
            Err(bad_request(code, err.to_string()))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::quizzes::entities::{GradingMode, QuizQuestion};
    use crate::models::quizzes::requests::CreateQuizRequest;
    use chrono::{Duration, Utc};

    /// QCM à 12 points et vrai/faux à 8 points, ouvert depuis une heure
    pub fn auto_quiz(class_id: i64, subject_id: i64) -> CreateQuizRequest {
        CreateQuizRequest {
            class_id,
            subject_id,
            title: "Conjugaison".into(),
            description: None,
            date_debut: Utc::now() - Duration::hours(1),
            date_limite: Utc::now() + Duration::days(1),
            grading_mode: GradingMode::Auto,
            scale: None,
            questions: vec![
                QuizQuestion::Qcm {
                    prompt: "Participe passé de « prendre »".into(),
                    points: 12.0,
                    options: vec!["prendu".into(), "pris".into()],
                    correct: vec![1],
                },
                QuizQuestion::VraiFaux {
                    prompt: "« Ils courent » est au présent".into(),
                    points: 8.0,
                    correct: true,
                },
            ],
        }
    }

    pub fn manual_quiz(class_id: i64, subject_id: i64) -> CreateQuizRequest {
        CreateQuizRequest {
            grading_mode: GradingMode::Manuel,
            scale: Some(10.0),
            questions: vec![
                QuizQuestion::VraiFaux {
                    prompt: "Victor Hugo a écrit Les Misérables".into(),
                    points: 4.0,
                    correct: true,
                },
                QuizQuestion::TexteLibre {
                    prompt: "Résumez le chapitre".into(),
                    points: 6.0,
                },
            ],
            ..auto_quiz(class_id, subject_id)
        }
    }
}
