//! Entité avis

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub audience: String,
    pub class_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_announcement(self) -> crate::models::announcements::entities::Announcement {
        use crate::models::announcements::entities::{Announcement, Audience};

        Announcement {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            content: self.content,
            audience: self.audience.parse::<Audience>().unwrap_or(Audience::Tous),
            class_id: self.class_id,
            created_at: super::ts(self.created_at),
        }
    }
}
