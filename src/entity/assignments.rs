//! Entité devoir

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub due_date: i64,
    pub submission_type: String,
    #[sea_orm(column_type = "Double")]
    pub max_grade: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::{Assignment, SubmissionType};

        Assignment {
            id: self.id,
            teacher_id: self.teacher_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            title: self.title,
            description: self.description,
            due_date: super::ts(self.due_date),
            submission_type: self
                .submission_type
                .parse::<SubmissionType>()
                .unwrap_or_default(),
            max_grade: self.max_grade,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
