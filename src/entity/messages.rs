//! Entité message

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_read: bool,
    pub sent_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_message(self) -> crate::models::messages::entities::Message {
        crate::models::messages::entities::Message {
            id: self.id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            content: self.content,
            is_read: self.is_read,
            sent_at: super::ts(self.sent_at),
        }
    }
}
