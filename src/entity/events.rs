//! Entité événement

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub start_at: i64,
    pub end_at: Option<i64>,
    pub location: Option<String>,
    pub class_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_event(self) -> crate::models::events::entities::Event {
        crate::models::events::entities::Event {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            description: self.description,
            start_at: super::ts(self.start_at),
            end_at: self.end_at.map(super::ts),
            location: self.location,
            class_id: self.class_id,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
