use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::submissions::{
    entities::{GradeOutcome, NewSubmission, Submission},
    responses::{MySubmissionItem, SubmissionWithStudent},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// Un seul rendu par (devoir, élève) ; l'index unique tranche les courses
    pub async fn create_submission_impl(&self, submission: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(submission.assignment_id),
            student_id: Set(submission.student_id),
            content: Set(submission.content),
            file_token: Set(submission.file_token),
            grade: Set(None),
            comment: Set(None),
            is_graded: Set(false),
            graded_by: Set(None),
            graded_at: Set(None),
            submitted_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                PortalError::conflict("Vous avez déjà rendu ce devoir")
            } else {
                PortalError::database_operation(format!("Failed to create submission: {e}"))
            }
        })?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to load submission: {e}"))
            })?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_student_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to load submission: {e}"))
            })?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn list_student_submissions_for_impl(
        &self,
        student_id: i64,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AssignmentId.is_in(assignment_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list submissions: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    /// Rendus d'un devoir avec le nom de l'élève
    pub async fn list_submissions_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>> {
        let submissions = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list submissions: {e}"))
            })?;

        let student_ids: Vec<i64> = submissions.iter().map(|s| s.student_id).collect();
        let names: HashMap<i64, (String, String)> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load students: {e}")))?
            .into_iter()
            .map(|u| (u.id, (u.first_name, u.last_name)))
            .collect();

        Ok(submissions
            .into_iter()
            .map(|m| {
                let (first, last) = names.get(&m.student_id).cloned().unwrap_or_default();
                SubmissionWithStudent {
                    submission: m.into_submission(),
                    student_first_name: first,
                    student_last_name: last,
                }
            })
            .collect())
    }

    /// Rendus d'un élève avec le titre du devoir
    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<MySubmissionItem>> {
        let submissions = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list submissions: {e}"))
            })?;

        let assignment_ids: Vec<i64> = submissions.iter().map(|s| s.assignment_id).collect();
        let assignments: HashMap<i64, (String, f64)> = Assignments::find()
            .filter(AssignmentColumn::Id.is_in(assignment_ids))
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to load assignments: {e}"))
            })?
            .into_iter()
            .map(|a| (a.id, (a.title, a.max_grade)))
            .collect();

        Ok(submissions
            .into_iter()
            .map(|m| {
                let (title, max_grade) = assignments
                    .get(&m.assignment_id)
                    .cloned()
                    .unwrap_or_default();
                MySubmissionItem {
                    submission: m.into_submission(),
                    assignment_title: title,
                    max_grade,
                }
            })
            .collect())
    }

    /// Modifie un rendu tant qu'il n'est pas corrigé
    pub async fn update_submission_content_impl(
        &self,
        submission_id: i64,
        content: Option<String>,
        file_token: Option<String>,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(Column::Content, Expr::value(content))
            .col_expr(Column::FileToken, Expr::value(file_token))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::IsGraded.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to update submission: {e}"))
            })?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_submission_by_id_impl(submission_id).await
    }

    /// Correction en une seule écriture conditionnelle : de deux correcteurs
    /// simultanés, un seul voit `rows_affected == 1`
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grade: f64,
        comment: Option<String>,
        grader_id: i64,
    ) -> Result<GradeOutcome<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(Column::Grade, Expr::value(grade))
            .col_expr(Column::Comment, Expr::value(comment))
            .col_expr(Column::IsGraded, Expr::value(true))
            .col_expr(Column::GradedBy, Expr::value(grader_id))
            .col_expr(Column::GradedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::IsGraded.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to grade submission: {e}"))
            })?;

        let current = self.get_submission_by_id_impl(submission_id).await?;
        Ok(match (result.rows_affected, current) {
            (0, Some(_)) => GradeOutcome::AlreadyGraded,
            (_, None) => GradeOutcome::NotFound,
            (_, Some(submission)) => GradeOutcome::Graded(submission),
        })
    }

    pub async fn count_graded_submissions_impl(&self, assignment_id: i64) -> Result<i64> {
        let count = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::IsGraded.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to count submissions: {e}"))
            })?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{Fixture, fixture};

    fn new_submission(fx: &Fixture) -> NewSubmission {
        NewSubmission {
            assignment_id: fx.assignment.id,
            student_id: fx.student.id,
            content: Some("Ma copie".into()),
            file_token: None,
        }
    }

    #[tokio::test]
    async fn test_one_submission_per_student() {
        let fx = fixture().await;
        fx.storage
            .create_submission_impl(new_submission(&fx))
            .await
            .expect("create");
        let err = fx
            .storage
            .create_submission_impl(new_submission(&fx))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, PortalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_grading_is_one_shot() {
        let fx = fixture().await;
        let submission = fx
            .storage
            .create_submission_impl(new_submission(&fx))
            .await
            .expect("create");

        let first = fx
            .storage
            .grade_submission_impl(submission.id, 15.5, Some("Bien".into()), fx.prof.id)
            .await
            .expect("grade");
        let GradeOutcome::Graded(graded) = first else {
            panic!("expected graded, got {first:?}");
        };
        assert!(graded.is_graded);
        assert_eq!(graded.grade, Some(15.5));
        assert_eq!(graded.graded_by, Some(fx.prof.id));

        let second = fx
            .storage
            .grade_submission_impl(submission.id, 2.0, None, fx.prof.id)
            .await
            .expect("grade");
        assert!(matches!(second, GradeOutcome::AlreadyGraded));

        let missing = fx
            .storage
            .grade_submission_impl(9999, 10.0, None, fx.prof.id)
            .await
            .expect("grade");
        assert!(matches!(missing, GradeOutcome::NotFound));

        // le contenu est figé lui aussi
        let edit = fx
            .storage
            .update_submission_content_impl(submission.id, Some("Autre".into()), None)
            .await
            .expect("update");
        assert!(edit.is_none());
        let stored = fx
            .storage
            .get_submission_by_id_impl(submission.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(stored.grade, Some(15.5));
        assert_eq!(stored.content.as_deref(), Some("Ma copie"));
    }

    #[tokio::test]
    async fn test_progress_and_listings() {
        let fx = fixture().await;
        let submission = fx
            .storage
            .create_submission_impl(new_submission(&fx))
            .await
            .expect("create");

        let progress = fx
            .storage
            .assignment_progress_impl(&[fx.assignment.id])
            .await
            .expect("progress");
        assert_eq!(progress.get(&fx.assignment.id), Some(&(1, 0)));

        fx.storage
            .grade_submission_impl(submission.id, 12.0, None, fx.prof.id)
            .await
            .expect("grade");
        let progress = fx
            .storage
            .assignment_progress_impl(&[fx.assignment.id])
            .await
            .expect("progress");
        assert_eq!(progress.get(&fx.assignment.id), Some(&(1, 1)));

        let by_assignment = fx
            .storage
            .list_submissions_by_assignment_impl(fx.assignment.id)
            .await
            .expect("list");
        assert_eq!(by_assignment.len(), 1);
        assert_eq!(by_assignment[0].student_last_name, fx.student.last_name);

        let mine = fx
            .storage
            .list_submissions_by_student_impl(fx.student.id)
            .await
            .expect("list");
        assert_eq!(mine[0].assignment_title, fx.assignment.title);
    }
}
