use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    common::page_window,
    users::{
        entities::{NewUser, User, UserRole},
        requests::{UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// Crée un compte
    pub async fn create_user_impl(&self, user: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let class_id = if user.role == UserRole::Eleve {
            user.class_id
        } else {
            None
        };

        let model = ActiveModel {
            login_code: Set(user.login_code),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            initial_password: Set(user.initial_password),
            role: Set(user.role.to_string()),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            class_id: Set(class_id),
            is_active: Set(true),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                PortalError::conflict("Identifiant déjà attribué")
            } else {
                PortalError::database_operation(format!("Failed to create user: {e}"))
            }
        })?;

        Ok(result.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_login_code_impl(&self, login_code: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::LoginCode.eq(login_code))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load users: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }

    pub async fn list_students_in_classes_impl(&self, class_ids: &[i64]) -> Result<Vec<User>> {
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = Users::find()
            .filter(Column::Role.eq(UserRole::ELEVE))
            .filter(Column::IsActive.eq(true))
            .filter(Column::ClassId.is_in(class_ids.iter().copied()))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list students: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }

    /// Liste paginée avec filtres
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Users::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::LoginCode.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped))
                    .add(Column::Email.contains(&escaped)),
            );
        }

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count users: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count pages: {e}")))?;
        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list users: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to update last login: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// Met à jour un compte ; un compte qui n'est plus élève perd sa classe
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let Some(existing) = self.get_user_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let role = update.role.unwrap_or(existing.role);

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(email) = update.email {
            model.email = Set((!email.trim().is_empty()).then_some(email));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        if update.role.is_some() {
            model.role = Set(role.to_string());
        }
        if role != UserRole::Eleve {
            model.class_id = Set(None);
        } else if let Some(class_id) = update.class_id {
            model.class_id = Set(Some(class_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to update user: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    pub async fn set_user_password_impl(
        &self,
        id: i64,
        password_hash: &str,
        initial_password: Option<String>,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(
                Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash.to_string()),
            )
            .col_expr(
                Column::InitialPassword,
                sea_orm::sea_query::Expr::value(initial_password),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to update password: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to delete user: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_pending_credentials_impl(&self, class_id: Option<i64>) -> Result<Vec<User>> {
        let mut select = Users::find().filter(Column::InitialPassword.is_not_null());
        if let Some(class_id) = class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        let result = select
            .order_by_asc(Column::ClassId)
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list credentials: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }

    pub async fn count_users_by_role_impl(&self, role: UserRole) -> Result<i64> {
        let count = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count users: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, new_user, seed_class};

    #[tokio::test]
    async fn test_create_and_find_by_login_code() {
        let storage = memory_storage().await;
        let class = seed_class(&storage, "6e A").await;
        let user = storage
            .create_user_impl(new_user("jdupont123", UserRole::Eleve, Some(class.id)))
            .await
            .expect("create");

        let found = storage
            .get_user_by_login_code_impl("jdupont123")
            .await
            .expect("query")
            .expect("present");
        assert_eq!(found.id, user.id);
        assert_eq!(found.class_id, Some(class.id));
        assert_eq!(found.initial_password.as_deref(), Some("Provisoire1"));
    }

    #[tokio::test]
    async fn test_duplicate_login_code_is_conflict() {
        let storage = memory_storage().await;
        storage
            .create_user_impl(new_user("mmartin001", UserRole::Prof, None))
            .await
            .expect("create");
        let err = storage
            .create_user_impl(new_user("mmartin001", UserRole::Prof, None))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, PortalError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_non_student_never_keeps_class() {
        let storage = memory_storage().await;
        let class = seed_class(&storage, "5e B").await;
        let prof = storage
            .create_user_impl(new_user("pdurand42", UserRole::Prof, Some(class.id)))
            .await
            .expect("create");
        assert_eq!(prof.class_id, None);

        let eleve = storage
            .create_user_impl(new_user("lbernard07", UserRole::Eleve, Some(class.id)))
            .await
            .expect("create");
        let updated = storage
            .update_user_impl(
                eleve.id,
                UpdateUserRequest {
                    role: Some(UserRole::Prof),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("present");
        assert_eq!(updated.role, UserRole::Prof);
        assert_eq!(updated.class_id, None);
    }

    #[tokio::test]
    async fn test_password_change_clears_pending_credentials() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(new_user("crobert11", UserRole::Prof, None))
            .await
            .expect("create");
        assert_eq!(storage.list_pending_credentials_impl(None).await.expect("list").len(), 1);

        assert!(
            storage
                .set_user_password_impl(user.id, "nouveau-hash", None)
                .await
                .expect("update")
        );
        let reloaded = storage
            .get_user_by_id_impl(user.id)
            .await
            .expect("query")
            .expect("present");
        assert_eq!(reloaded.password_hash, "nouveau-hash");
        assert!(reloaded.initial_password.is_none());
        assert!(storage.list_pending_credentials_impl(None).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_search_and_filters() {
        let storage = memory_storage().await;
        let class = seed_class(&storage, "4e C").await;
        let mut a = new_user("adurand01", UserRole::Eleve, Some(class.id));
        a.last_name = "Durand".into();
        storage.create_user_impl(a).await.expect("create");
        let mut b = new_user("bpetit02", UserRole::Eleve, Some(class.id));
        b.last_name = "Petit".into();
        storage.create_user_impl(b).await.expect("create");
        storage
            .create_user_impl(new_user("cprof03", UserRole::Prof, None))
            .await
            .expect("create");

        let found = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("dur".into()),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].login_code, "adurand01");

        let students = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Eleve),
                class_id: Some(class.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(students.pagination.total, 2);
    }
}
