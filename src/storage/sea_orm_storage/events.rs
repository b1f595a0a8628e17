use super::SeaOrmStorage;
use crate::entity::events::{ActiveModel, Column, Entity as Events};
use crate::errors::{PortalError, Result};
use crate::models::events::{
    entities::{Event, EventRange, NewEvent},
    requests::UpdateEventRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_event_impl(&self, event: NewEvent) -> Result<Event> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            author_id: Set(event.author_id),
            title: Set(event.title),
            description: Set(event.description),
            start_at: Set(event.start_at.timestamp()),
            end_at: Set(event.end_at.map(|d| d.timestamp())),
            location: Set(event.location),
            class_id: Set(event.class_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to create event: {e}")))?;

        Ok(result.into_event())
    }

    pub async fn get_event_by_id_impl(&self, event_id: i64) -> Result<Option<Event>> {
        let result = Events::find_by_id(event_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load event: {e}")))?;

        Ok(result.map(|m| m.into_event()))
    }

    /// Événements qui chevauchent `[from, to]`, par date de début
    pub async fn list_events_impl(&self, range: EventRange) -> Result<Vec<Event>> {
        let mut select = Events::find();

        if let Some(to) = range.to {
            select = select.filter(Column::StartAt.lte(to.timestamp()));
        }
        if let Some(from) = range.from {
            let from = from.timestamp();
            select = select.filter(
                Condition::any()
                    .add(Column::StartAt.gte(from))
                    .add(Column::EndAt.gte(from)),
            );
        }
        if let Some(class_ids) = range.class_ids {
            let mut cond = Condition::any().add(Column::ClassId.is_null());
            if !class_ids.is_empty() {
                cond = cond.add(Column::ClassId.is_in(class_ids));
            }
            if let Some(author_id) = range.author_id {
                cond = cond.add(Column::AuthorId.eq(author_id));
            }
            select = select.filter(cond);
        }

        let result = select
            .order_by_asc(Column::StartAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list events: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_event()).collect())
    }

    pub async fn update_event_impl(
        &self,
        event_id: i64,
        update: UpdateEventRequest,
    ) -> Result<Option<Event>> {
        if self.get_event_by_id_impl(event_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(event_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set((!description.trim().is_empty()).then_some(description));
        }
        if let Some(start_at) = update.start_at {
            model.start_at = Set(start_at.timestamp());
        }
        if let Some(end_at) = update.end_at {
            model.end_at = Set(Some(end_at.timestamp()));
        }
        if let Some(location) = update.location {
            model.location = Set((!location.trim().is_empty()).then_some(location));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to update event: {e}")))?;

        self.get_event_by_id_impl(event_id).await
    }

    pub async fn delete_event_impl(&self, event_id: i64) -> Result<bool> {
        let result = Events::delete_by_id(event_id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to delete event: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{fixture, seed_class};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_range_and_class_visibility() {
        let fx = fixture().await;
        let other = seed_class(&fx.storage, "Terminale").await;
        let now = Utc::now();
        let mk = |title: &str, days: i64, class_id: Option<i64>| NewEvent {
            author_id: fx.admin.id,
            title: title.to_string(),
            description: None,
            start_at: now + Duration::days(days),
            end_at: None,
            location: None,
            class_id,
        };
        for e in [
            mk("Brevet blanc", 3, None),
            mk("Sortie musée", 1, Some(fx.class.id)),
            mk("Bac blanc", 2, Some(other.id)),
            mk("Vacances", 40, None),
        ] {
            fx.storage.create_event_impl(e).await.expect("create");
        }

        let visible = fx
            .storage
            .list_events_impl(EventRange {
                from: Some(now),
                to: Some(now + Duration::days(10)),
                class_ids: Some(vec![fx.class.id]),
                author_id: None,
            })
            .await
            .expect("list");
        let titles: Vec<&str> = visible.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Sortie musée", "Brevet blanc"]);

        let everything = fx
            .storage
            .list_events_impl(EventRange::default())
            .await
            .expect("list");
        assert_eq!(everything.len(), 4);
    }
}
