use std::collections::{BTreeSet, HashMap};

use super::SeaOrmStorage;
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::entity::teachings::{ActiveModel, Column, Entity as Teachings};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    classes::entities::Class,
    subjects::entities::Subject,
    teachings::{
        entities::{Teaching, TeachingDetail},
        requests::TeachingListQuery,
    },
    users::entities::{User, UserRole},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_teaching_impl(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> Result<Teaching> {
        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            class_id: Set(class_id),
            subject_id: Set(subject_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                PortalError::conflict("Cet enseignement existe déjà")
            } else {
                PortalError::database_operation(format!("Failed to create teaching: {e}"))
            }
        })?;

        Ok(result.into_teaching())
    }

    pub async fn get_teaching_by_id_impl(&self, teaching_id: i64) -> Result<Option<Teaching>> {
        let result = Teachings::find_by_id(teaching_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load teaching: {e}")))?;

        Ok(result.map(|m| m.into_teaching()))
    }

    pub async fn find_teaching_impl(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> Result<Option<Teaching>> {
        let result = Teachings::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::SubjectId.eq(subject_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load teaching: {e}")))?;

        Ok(result.map(|m| m.into_teaching()))
    }

    pub async fn teaches_class_impl(&self, teacher_id: i64, class_id: i64) -> Result<bool> {
        let count = Teachings::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to check teaching: {e}"))
            })?;

        Ok(count > 0)
    }

    /// Affectations avec les noms du prof, de la classe et de la matière
    pub async fn list_teachings_impl(
        &self,
        query: TeachingListQuery,
    ) -> Result<Vec<TeachingDetail>> {
        let mut select = Teachings::find();
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        let teachings = select
            .order_by_asc(Column::ClassId)
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list teachings: {e}"))
            })?;

        let teacher_ids: BTreeSet<i64> = teachings.iter().map(|t| t.teacher_id).collect();
        let class_ids: BTreeSet<i64> = teachings.iter().map(|t| t.class_id).collect();
        let subject_ids: BTreeSet<i64> = teachings.iter().map(|t| t.subject_id).collect();

        let teachers: HashMap<i64, String> = Users::find()
            .filter(UserColumn::Id.is_in(teacher_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load teachers: {e}")))?
            .into_iter()
            .map(|u| (u.id, format!("{} {}", u.first_name, u.last_name)))
            .collect();
        let classes: HashMap<i64, String> = Classes::find()
            .filter(ClassColumn::Id.is_in(class_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load classes: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let subjects: HashMap<i64, String> = Subjects::find()
            .filter(SubjectColumn::Id.is_in(subject_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load subjects: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        Ok(teachings
            .into_iter()
            .map(|t| TeachingDetail {
                id: t.id,
                teacher_id: t.teacher_id,
                teacher_name: teachers.get(&t.teacher_id).cloned().unwrap_or_default(),
                class_id: t.class_id,
                class_name: classes.get(&t.class_id).cloned().unwrap_or_default(),
                subject_id: t.subject_id,
                subject_name: subjects.get(&t.subject_id).cloned().unwrap_or_default(),
            })
            .collect())
    }

    pub async fn delete_teaching_impl(&self, teaching_id: i64) -> Result<bool> {
        let result = Teachings::delete_by_id(teaching_id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to delete teaching: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    async fn distinct_teaching_column(&self, filter: sea_orm::Condition, column: Column) -> Result<Vec<i64>> {
        Teachings::find()
            .select_only()
            .column(column)
            .distinct()
            .filter(filter)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list teachings: {e}")))
    }

    /// Classes où enseigne un prof, sans doublon
    pub async fn list_teacher_classes_impl(&self, teacher_id: i64) -> Result<Vec<Class>> {
        let ids = self
            .distinct_teaching_column(
                sea_orm::Condition::all().add(Column::TeacherId.eq(teacher_id)),
                Column::ClassId,
            )
            .await?;

        let result = Classes::find()
            .filter(ClassColumn::Id.is_in(ids))
            .order_by_asc(ClassColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list classes: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_class()).collect())
    }

    pub async fn list_teacher_subjects_impl(&self, teacher_id: i64) -> Result<Vec<Subject>> {
        let ids = self
            .distinct_teaching_column(
                sea_orm::Condition::all().add(Column::TeacherId.eq(teacher_id)),
                Column::SubjectId,
            )
            .await?;

        let result = Subjects::find()
            .filter(SubjectColumn::Id.is_in(ids))
            .order_by_asc(SubjectColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list subjects: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_subject()).collect())
    }

    /// Profs actifs qui enseignent dans une classe ; un compte qui a changé
    /// de rôle garde ses affectations mais n'apparaît plus
    pub async fn list_class_teachers_impl(&self, class_id: i64) -> Result<Vec<User>> {
        let ids = self
            .distinct_teaching_column(
                sea_orm::Condition::all().add(Column::ClassId.eq(class_id)),
                Column::TeacherId,
            )
            .await?;

        let result = Users::find()
            .filter(UserColumn::Id.is_in(ids))
            .filter(UserColumn::IsActive.eq(true))
            .filter(UserColumn::Role.eq(UserRole::PROF))
            .order_by_asc(UserColumn::LastName)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list teachers: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }
}
