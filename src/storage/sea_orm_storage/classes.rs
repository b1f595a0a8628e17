use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    classes::{
        entities::Class,
        requests::{CreateClassRequest, UpdateClassRequest},
        responses::ClassWithCount,
    },
    users::entities::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            level: Set(req.level),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                PortalError::conflict("Une classe porte déjà ce nom")
            } else {
                PortalError::database_operation(format!("Failed to create class: {e}"))
            }
        })?;

        Ok(result.into_class())
    }

    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load class: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn get_class_by_name_impl(&self, name: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load class: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// Toutes les classes, avec leur effectif
    pub async fn list_classes_impl(&self) -> Result<Vec<ClassWithCount>> {
        let classes = Classes::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list classes: {e}")))?;

        let counts: HashMap<i64, i64> = Users::find()
            .select_only()
            .column(UserColumn::ClassId)
            .column_as(UserColumn::Id.count(), "student_count")
            .filter(UserColumn::Role.eq(UserRole::ELEVE))
            .filter(UserColumn::ClassId.is_not_null())
            .group_by(UserColumn::ClassId)
            .into_tuple::<(Option<i64>, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count students: {e}")))?
            .into_iter()
            .filter_map(|(class_id, count)| class_id.map(|id| (id, count)))
            .collect();

        Ok(classes
            .into_iter()
            .map(|m| {
                let student_count = counts.get(&m.id).copied().unwrap_or(0);
                ClassWithCount {
                    class: m.into_class(),
                    student_count,
                }
            })
            .collect())
    }

    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(class_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(level) = update.level {
            model.level = Set((!level.trim().is_empty()).then_some(level));
        }

        model.update(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                PortalError::conflict("Une classe porte déjà ce nom")
            } else {
                PortalError::database_operation(format!("Failed to update class: {e}"))
            }
        })?;

        self.get_class_by_id_impl(class_id).await
    }

    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to delete class: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_students_in_class_impl(&self, class_id: i64) -> Result<i64> {
        let count = Users::find()
            .filter(UserColumn::Role.eq(UserRole::ELEVE))
            .filter(UserColumn::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count students: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, new_user, seed_class};

    #[tokio::test]
    async fn test_list_classes_counts_students() {
        let storage = memory_storage().await;
        let a = seed_class(&storage, "3e A").await;
        let b = seed_class(&storage, "3e B").await;
        for code in ["e1", "e2"] {
            storage
                .create_user_impl(new_user(code, UserRole::Eleve, Some(a.id)))
                .await
                .expect("create");
        }

        let classes = storage.list_classes_impl().await.expect("list");
        let count_of = |id: i64| {
            classes
                .iter()
                .find(|c| c.class.id == id)
                .map(|c| c.student_count)
        };
        assert_eq!(count_of(a.id), Some(2));
        assert_eq!(count_of(b.id), Some(0));
        assert_eq!(storage.count_students_in_class_impl(a.id).await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_class_name_is_unique() {
        let storage = memory_storage().await;
        seed_class(&storage, "2nde 1").await;
        let err = storage
            .create_class_impl(CreateClassRequest {
                name: "2nde 1".into(),
                level: None,
            })
            .await
            .expect_err("duplicate");
        assert!(matches!(err, PortalError::Conflict(_)));
    }
}
