use super::SeaOrmStorage;
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{PortalError, Result};
use crate::models::subjects::entities::Subject;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

fn subject_write_error(e: sea_orm::DbErr, action: &str) -> PortalError {
    if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
        PortalError::conflict("Cette matière existe déjà")
    } else {
        PortalError::database_operation(format!("Failed to {action} subject: {e}"))
    }
}

impl SeaOrmStorage {
    pub async fn create_subject_impl(&self, name: &str) -> Result<Subject> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| subject_write_error(e, "create"))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, subject_id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(subject_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load subject: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn get_subject_by_name_impl(&self, name: &str) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load subject: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let result = Subjects::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list subjects: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn update_subject_impl(&self, subject_id: i64, name: &str) -> Result<Option<Subject>> {
        if self.get_subject_by_id_impl(subject_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(subject_id),
            name: Set(name.to_string()),
            ..Default::default()
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| subject_write_error(e, "update"))?;

        self.get_subject_by_id_impl(subject_id).await
    }

    pub async fn delete_subject_impl(&self, subject_id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(subject_id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to delete subject: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::PortalError;
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    #[tokio::test]
    async fn test_subject_crud() {
        let storage = memory_storage().await;
        let maths = storage.create_subject_impl("Mathématiques").await.expect("create");
        storage.create_subject_impl("Histoire").await.expect("create");

        let names: Vec<String> = storage
            .list_subjects_impl()
            .await
            .expect("list")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Histoire".to_string(), "Mathématiques".to_string()]);

        let err = storage
            .update_subject_impl(maths.id, "Histoire")
            .await
            .expect_err("duplicate");
        assert!(matches!(err, PortalError::Conflict(_)));

        assert!(storage.delete_subject_impl(maths.id).await.expect("delete"));
        assert!(storage.get_subject_by_id_impl(maths.id).await.expect("get").is_none());
    }
}
