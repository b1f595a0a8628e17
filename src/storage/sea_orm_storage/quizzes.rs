use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::quiz_responses::{
    ActiveModel as ResponseActiveModel, Column as ResponseColumn, Entity as QuizResponses,
};
use crate::entity::quizzes::{ActiveModel, Column, Entity as Quizzes};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    quizzes::{
        entities::{NewQuizResponse, Quiz, QuizDraft, QuizResponse},
        requests::QuizListQuery,
        responses::QuizResponseWithStudent,
    },
    submissions::entities::GradeOutcome,
};
use crate::storage::ProgressCounts;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_quiz_impl(&self, draft: QuizDraft) -> Result<Quiz> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(draft.teacher_id),
            class_id: Set(draft.class_id),
            subject_id: Set(draft.subject_id),
            title: Set(draft.title),
            description: Set(draft.description),
            starts_at: Set(draft.starts_at.timestamp()),
            deadline: Set(draft.deadline.timestamp()),
            grading_mode: Set(draft.grading_mode.to_string()),
            scale: Set(draft.scale),
            questions: Set(serde_json::to_string(&draft.questions)?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to create quiz: {e}")))?;

        result.into_quiz()
    }

    pub async fn get_quiz_by_id_impl(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        let result = Quizzes::find_by_id(quiz_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load quiz: {e}")))?;

        result.map(|m| m.into_quiz()).transpose()
    }

    /// Ouverture la plus récente d'abord
    pub async fn list_quizzes_impl(&self, query: QuizListQuery) -> Result<Vec<Quiz>> {
        let mut select = Quizzes::find();
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        select
            .order_by_desc(Column::StartsAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list quizzes: {e}")))?
            .into_iter()
            .map(|m| m.into_quiz())
            .collect()
    }

    /// Remplace le contenu éditable ; auteur, classe et matière ne changent pas
    pub async fn update_quiz_impl(&self, quiz_id: i64, draft: QuizDraft) -> Result<Option<Quiz>> {
        if self.get_quiz_by_id_impl(quiz_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(quiz_id),
            title: Set(draft.title),
            description: Set(draft.description),
            starts_at: Set(draft.starts_at.timestamp()),
            deadline: Set(draft.deadline.timestamp()),
            grading_mode: Set(draft.grading_mode.to_string()),
            scale: Set(draft.scale),
            questions: Set(serde_json::to_string(&draft.questions)?),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to update quiz: {e}")))?;

        self.get_quiz_by_id_impl(quiz_id).await
    }

    pub async fn delete_quiz_impl(&self, quiz_id: i64) -> Result<bool> {
        let result = Quizzes::delete_by_id(quiz_id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to delete quiz: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// (réponses, corrigées) par quiz
    pub async fn quiz_progress_impl(&self, quiz_ids: &[i64]) -> Result<ProgressCounts> {
        let mut counts = ProgressCounts::new();
        if quiz_ids.is_empty() {
            return Ok(counts);
        }

        let rows = QuizResponses::find()
            .select_only()
            .column(ResponseColumn::QuizId)
            .column(ResponseColumn::IsGraded)
            .filter(ResponseColumn::QuizId.is_in(quiz_ids.iter().copied()))
            .into_tuple::<(i64, bool)>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count responses: {e}")))?;

        for (quiz_id, is_graded) in rows {
            let entry = counts.entry(quiz_id).or_insert((0, 0));
            entry.0 += 1;
            if is_graded {
                entry.1 += 1;
            }
        }
        Ok(counts)
    }

    /// Une réponse par élève ; en mode auto elle arrive déjà notée
    pub async fn create_quiz_response_impl(&self, response: NewQuizResponse) -> Result<QuizResponse> {
        let now = chrono::Utc::now().timestamp();
        let is_graded = response.final_grade.is_some();

        let model = ResponseActiveModel {
            quiz_id: Set(response.quiz_id),
            student_id: Set(response.student_id),
            answers: Set(serde_json::to_string(&response.answers)?),
            auto_score: Set(response.auto_score),
            final_grade: Set(response.final_grade),
            is_graded: Set(is_graded),
            graded_by: Set(None),
            graded_at: Set(is_graded.then_some(now)),
            submitted_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                PortalError::conflict("Vous avez déjà répondu à ce quiz")
            } else {
                PortalError::database_operation(format!("Failed to record quiz response: {e}"))
            }
        })?;

        result.into_quiz_response()
    }

    pub async fn get_quiz_response_by_id_impl(&self, response_id: i64) -> Result<Option<QuizResponse>> {
        let result = QuizResponses::find_by_id(response_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to load quiz response: {e}"))
            })?;

        result.map(|m| m.into_quiz_response()).transpose()
    }

    pub async fn get_student_quiz_response_impl(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizResponse>> {
        let result = QuizResponses::find()
            .filter(ResponseColumn::QuizId.eq(quiz_id))
            .filter(ResponseColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to load quiz response: {e}"))
            })?;

        result.map(|m| m.into_quiz_response()).transpose()
    }

    pub async fn list_student_quiz_responses_impl(
        &self,
        student_id: i64,
        quiz_ids: &[i64],
    ) -> Result<Vec<QuizResponse>> {
        if quiz_ids.is_empty() {
            return Ok(Vec::new());
        }
        QuizResponses::find()
            .filter(ResponseColumn::StudentId.eq(student_id))
            .filter(ResponseColumn::QuizId.is_in(quiz_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list quiz responses: {e}"))
            })?
            .into_iter()
            .map(|m| m.into_quiz_response())
            .collect()
    }

    pub async fn list_quiz_responses_impl(&self, quiz_id: i64) -> Result<Vec<QuizResponseWithStudent>> {
        let responses = QuizResponses::find()
            .filter(ResponseColumn::QuizId.eq(quiz_id))
            .order_by_asc(ResponseColumn::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list quiz responses: {e}"))
            })?;

        let student_ids: Vec<i64> = responses.iter().map(|r| r.student_id).collect();
        let names: HashMap<i64, (String, String)> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load students: {e}")))?
            .into_iter()
            .map(|u| (u.id, (u.first_name, u.last_name)))
            .collect();

        responses
            .into_iter()
            .map(|m| {
                let (first, last) = names.get(&m.student_id).cloned().unwrap_or_default();
                Ok(QuizResponseWithStudent {
                    response: m.into_quiz_response()?,
                    student_first_name: first,
                    student_last_name: last,
                })
            })
            .collect()
    }

    /// Même verrou que pour les soumissions : écriture conditionnée à `is_graded = false`
    pub async fn grade_quiz_response_impl(
        &self,
        response_id: i64,
        grade: f64,
        grader_id: i64,
    ) -> Result<GradeOutcome<QuizResponse>> {
        let now = chrono::Utc::now().timestamp();

        let result = QuizResponses::update_many()
            .col_expr(ResponseColumn::FinalGrade, Expr::value(grade))
            .col_expr(ResponseColumn::IsGraded, Expr::value(true))
            .col_expr(ResponseColumn::GradedBy, Expr::value(grader_id))
            .col_expr(ResponseColumn::GradedAt, Expr::value(now))
            .filter(ResponseColumn::Id.eq(response_id))
            .filter(ResponseColumn::IsGraded.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to grade quiz response: {e}"))
            })?;

        let current = self.get_quiz_response_by_id_impl(response_id).await?;
        Ok(match (result.rows_affected, current) {
            (0, Some(_)) => GradeOutcome::AlreadyGraded,
            (_, None) => GradeOutcome::NotFound,
            (_, Some(response)) => GradeOutcome::Graded(response),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quizzes::entities::{GradingMode, QuizAnswer, QuizQuestion};
    use crate::storage::sea_orm_storage::test_support::{Fixture, fixture};
    use chrono::{Duration, Utc};

    fn draft(fx: &Fixture, mode: GradingMode) -> QuizDraft {
        let now = Utc::now();
        QuizDraft {
            teacher_id: fx.prof.id,
            class_id: fx.class.id,
            subject_id: fx.subject.id,
            title: "Fractions".into(),
            description: None,
            starts_at: now - Duration::hours(1),
            deadline: now + Duration::hours(1),
            grading_mode: mode,
            scale: 10.0,
            questions: vec![
                QuizQuestion::Qcm {
                    prompt: "1/2 + 1/2 ?".into(),
                    points: 5.0,
                    options: vec!["1".into(), "2".into()],
                    correct: vec![0],
                },
                QuizQuestion::VraiFaux {
                    prompt: "1/3 > 1/2".into(),
                    points: 5.0,
                    correct: false,
                },
            ],
        }
    }

    fn response(quiz_id: i64, student_id: i64, final_grade: Option<f64>) -> NewQuizResponse {
        NewQuizResponse {
            quiz_id,
            student_id,
            answers: vec![
                QuizAnswer::Qcm { selected: vec![0] },
                QuizAnswer::VraiFaux { value: true },
            ],
            auto_score: 5.0,
            final_grade,
        }
    }

    #[tokio::test]
    async fn test_questions_survive_storage() {
        let fx = fixture().await;
        let quiz = fx
            .storage
            .create_quiz_impl(draft(&fx, GradingMode::Auto))
            .await
            .expect("create");
        let loaded = fx
            .storage
            .get_quiz_by_id_impl(quiz.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.questions, quiz.questions);
        assert_eq!(loaded.grading_mode, GradingMode::Auto);
        assert_eq!(loaded.scale, 10.0);
    }

    #[tokio::test]
    async fn test_auto_response_is_stored_graded() {
        let fx = fixture().await;
        let quiz = fx
            .storage
            .create_quiz_impl(draft(&fx, GradingMode::Auto))
            .await
            .expect("create");
        let stored = fx
            .storage
            .create_quiz_response_impl(response(quiz.id, fx.student.id, Some(5.0)))
            .await
            .expect("respond");
        assert!(stored.is_graded);
        assert_eq!(stored.final_grade, Some(5.0));

        let err = fx
            .storage
            .create_quiz_response_impl(response(quiz.id, fx.student.id, Some(5.0)))
            .await
            .expect_err("second answer");
        assert!(matches!(err, PortalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_manual_grade_locks_response() {
        let fx = fixture().await;
        let quiz = fx
            .storage
            .create_quiz_impl(draft(&fx, GradingMode::Manuel))
            .await
            .expect("create");
        let stored = fx
            .storage
            .create_quiz_response_impl(response(quiz.id, fx.student.id, None))
            .await
            .expect("respond");
        assert!(!stored.is_graded);
        assert_eq!(
            fx.storage.quiz_progress_impl(&[quiz.id]).await.expect("progress").get(&quiz.id),
            Some(&(1, 0))
        );

        let outcome = fx
            .storage
            .grade_quiz_response_impl(stored.id, 7.5, fx.prof.id)
            .await
            .expect("grade");
        assert!(matches!(outcome, GradeOutcome::Graded(ref r) if r.final_grade == Some(7.5)));

        let again = fx
            .storage
            .grade_quiz_response_impl(stored.id, 10.0, fx.prof.id)
            .await
            .expect("grade");
        assert!(matches!(again, GradeOutcome::AlreadyGraded));

        let listed = fx.storage.list_quiz_responses_impl(quiz.id).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].response.final_grade, Some(7.5));
        assert_eq!(listed[0].student_first_name, fx.student.first_name);
    }
}
