//! Entité cours

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub file_token: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course(self) -> crate::models::courses::entities::Course {
        crate::models::courses::entities::Course {
            id: self.id,
            teacher_id: self.teacher_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            title: self.title,
            content: self.content,
            file_token: self.file_token,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
