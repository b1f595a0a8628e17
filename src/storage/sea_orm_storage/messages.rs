use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::messages::{ActiveModel, Column, Entity as Messages};
use crate::errors::{PortalError, Result};
use crate::models::messages::entities::Message;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_message_impl(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: &str,
    ) -> Result<Message> {
        let model = ActiveModel {
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            content: Set(content.to_string()),
            is_read: Set(false),
            sent_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to send message: {e}")))?;

        Ok(result.into_message())
    }

    /// Fil de discussion par id croissant ; sans `after_id`, les `limit` derniers
    pub async fn list_conversation_impl(
        &self,
        user_id: i64,
        other_id: i64,
        after_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<Message>> {
        let pair = Condition::any()
            .add(
                Condition::all()
                    .add(Column::SenderId.eq(user_id))
                    .add(Column::RecipientId.eq(other_id)),
            )
            .add(
                Condition::all()
                    .add(Column::SenderId.eq(other_id))
                    .add(Column::RecipientId.eq(user_id)),
            );

        let mut messages = match after_id {
            Some(after_id) => Messages::find()
                .filter(pair)
                .filter(Column::Id.gt(after_id))
                .order_by_asc(Column::Id)
                .limit(limit)
                .all(&self.db)
                .await,
            None => Messages::find()
                .filter(pair)
                .order_by_desc(Column::Id)
                .limit(limit)
                .all(&self.db)
                .await,
        }
        .map_err(|e| PortalError::database_operation(format!("Failed to load conversation: {e}")))?;

        if after_id.is_none() {
            messages.reverse();
        }
        Ok(messages.into_iter().map(|m| m.into_message()).collect())
    }

    pub async fn mark_conversation_read_impl(&self, reader_id: i64, sender_id: i64) -> Result<u64> {
        let result = Messages::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::RecipientId.eq(reader_id))
            .filter(Column::SenderId.eq(sender_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to mark messages read: {e}"))
            })?;

        Ok(result.rows_affected)
    }

    pub async fn unread_counts_by_sender_impl(&self, recipient_id: i64) -> Result<HashMap<i64, i64>> {
        let rows = Messages::find()
            .select_only()
            .column(Column::SenderId)
            .column_as(Column::Id.count(), "unread")
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(Column::IsRead.eq(false))
            .group_by(Column::SenderId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count unread: {e}")))?;

        Ok(rows.into_iter().collect())
    }

    pub async fn count_unread_messages_impl(&self, recipient_id: i64) -> Result<i64> {
        let count = Messages::find()
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count unread: {e}")))?;

        Ok(count as i64)
    }
}
