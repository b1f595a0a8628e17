//! Entité quiz ; les questions sont stockées en JSON

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quizzes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub starts_at: i64,
    pub deadline: i64,
    pub grading_mode: String,
    #[sea_orm(column_type = "Double")]
    pub scale: f64,
    #[sea_orm(column_type = "Text")]
    pub questions: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quiz_responses::Entity")]
    Responses,
}

impl Related<super::quiz_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_quiz(self) -> crate::errors::Result<crate::models::quizzes::entities::Quiz> {
        use crate::models::quizzes::entities::{GradingMode, Quiz};

        Ok(Quiz {
            id: self.id,
            teacher_id: self.teacher_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            title: self.title,
            description: self.description,
            starts_at: super::ts(self.starts_at),
            deadline: super::ts(self.deadline),
            grading_mode: self.grading_mode.parse::<GradingMode>().unwrap_or_default(),
            scale: self.scale,
            questions: serde_json::from_str(&self.questions)?,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        })
    }
}
