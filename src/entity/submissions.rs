//! Entité soumission

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub file_token: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub grade: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub is_graded: bool,
    pub graded_by: Option<i64>,
    pub graded_at: Option<i64>,
    pub submitted_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        crate::models::submissions::entities::Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            content: self.content,
            file_token: self.file_token,
            grade: self.grade,
            comment: self.comment,
            is_graded: self.is_graded,
            graded_by: self.graded_by,
            graded_at: self.graded_at.map(super::ts),
            submitted_at: super::ts(self.submitted_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
