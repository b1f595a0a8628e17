use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    assignments::{
        entities::Assignment,
        requests::{
            AssignmentListQuery, CreateAssignmentRequest, DEFAULT_MAX_GRADE,
            UpdateAssignmentRequest,
        },
    },
    common::page_window,
};
use crate::storage::ProgressCounts;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_assignment_impl(
        &self,
        teacher_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.timestamp()),
            submission_type: Set(req.submission_type.to_string()),
            max_grade: Set(req.max_grade.unwrap_or(DEFAULT_MAX_GRADE)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to create assignment: {e}"))
        })?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to load assignment: {e}"))
            })?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// Échéance la plus proche d'abord
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<PaginatedResponse<Assignment>> {
        let (page, size) = page_window(query.page, query.size);

        let mut select = Assignments::find();
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        select = select.order_by_desc(Column::DueDate).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count assignments: {e}"))
        })?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count pages: {e}")))?;
        let assignments = paginator.fetch_page(page - 1).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to list assignments: {e}"))
        })?;

        Ok(PaginatedResponse {
            items: assignments
                .into_iter()
                .map(|m| m.into_assignment())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(assignment_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(assignment_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set((!description.trim().is_empty()).then_some(description));
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date.timestamp());
        }
        if let Some(submission_type) = update.submission_type {
            model.submission_type = Set(submission_type.to_string());
        }
        if let Some(max_grade) = update.max_grade {
            model.max_grade = Set(max_grade);
        }

        model.update(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to update assignment: {e}"))
        })?;

        self.get_assignment_by_id_impl(assignment_id).await
    }

    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to delete assignment: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// (rendus, corrigés) par devoir
    pub async fn assignment_progress_impl(&self, assignment_ids: &[i64]) -> Result<ProgressCounts> {
        let mut counts = ProgressCounts::new();
        if assignment_ids.is_empty() {
            return Ok(counts);
        }

        let rows = Submissions::find()
            .select_only()
            .column(SubmissionColumn::AssignmentId)
            .column(SubmissionColumn::IsGraded)
            .filter(SubmissionColumn::AssignmentId.is_in(assignment_ids.iter().copied()))
            .into_tuple::<(i64, bool)>()
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to count submissions: {e}"))
            })?;

        for (assignment_id, is_graded) in rows {
            let entry = counts.entry(assignment_id).or_insert((0, 0));
            entry.0 += 1;
            if is_graded {
                entry.1 += 1;
            }
        }
        Ok(counts)
    }
}
