//! Entité réponse à un quiz

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    #[sea_orm(column_type = "Double")]
    pub auto_score: f64,
    #[sea_orm(column_type = "Double", nullable)]
    pub final_grade: Option<f64>,
    pub is_graded: bool,
    pub graded_by: Option<i64>,
    pub graded_at: Option<i64>,
    pub submitted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quizzes::Entity",
        from = "Column::QuizId",
        to = "super::quizzes::Column::Id"
    )]
    Quiz,
}

impl Related<super::quizzes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_quiz_response(
        self,
    ) -> crate::errors::Result<crate::models::quizzes::entities::QuizResponse> {
        Ok(crate::models::quizzes::entities::QuizResponse {
            id: self.id,
            quiz_id: self.quiz_id,
            student_id: self.student_id,
            answers: serde_json::from_str(&self.answers)?,
            auto_score: self.auto_score,
            final_grade: self.final_grade,
            is_graded: self.is_graded,
            graded_by: self.graded_by,
            graded_at: self.graded_at.map(super::ts),
            submitted_at: super::ts(self.submitted_at),
        })
    }
}
