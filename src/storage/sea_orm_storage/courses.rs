use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    common::page_window,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_course_impl(
        &self,
        teacher_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            title: Set(req.title),
            content: Set(req.content),
            file_token: Set(req.file_token),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to create course: {e}")))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load course: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// Les plus récents d'abord
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Courses::find();
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count courses: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count pages: {e}")))?;
        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list courses: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(course_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(course_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        // chaîne vide : retire la pièce jointe
        if let Some(file_token) = update.file_token {
            model.file_token = Set((!file_token.is_empty()).then_some(file_token));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to update course: {e}")))?;

        self.get_course_by_id_impl(course_id).await
    }

    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(course_id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to delete course: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{
        memory_storage, new_user, seed_class, seed_subject,
    };

    #[tokio::test]
    async fn test_course_filters_and_update() {
        let storage = memory_storage().await;
        let a = seed_class(&storage, "6e 1").await;
        let b = seed_class(&storage, "6e 2").await;
        let svt = seed_subject(&storage, "SVT").await;
        let prof = storage
            .create_user_impl(new_user("prof", UserRole::Prof, None))
            .await
            .expect("create");

        let mk = |class_id: i64, title: &str| CreateCourseRequest {
            class_id,
            subject_id: svt.id,
            title: title.to_string(),
            content: "Contenu".into(),
            file_token: None,
        };
        let first = storage
            .create_course_impl(prof.id, mk(a.id, "La cellule"))
            .await
            .expect("create");
        storage
            .create_course_impl(prof.id, mk(b.id, "Les volcans"))
            .await
            .expect("create");

        let for_a = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                class_id: Some(a.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(for_a.pagination.total, 1);
        assert_eq!(for_a.items[0].title, "La cellule");

        let updated = storage
            .update_course_impl(
                first.id,
                UpdateCourseRequest {
                    title: Some("La cellule animale".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("present");
        assert_eq!(updated.title, "La cellule animale");
        assert_eq!(updated.content, "Contenu");
    }
}
