use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    announcements::{
        entities::{Announcement, AnnouncementVisibility, Audience, NewAnnouncement},
        responses::{AnnouncementListResponse, AnnouncementWithAuthor},
    },
    common::page_window,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_announcement_impl(&self, req: NewAnnouncement) -> Result<Announcement> {
        let class_id = match req.audience {
            Audience::Classe => req.class_id,
            _ => None,
        };

        let model = ActiveModel {
            author_id: Set(req.author_id),
            title: Set(req.title),
            content: Set(req.content),
            audience: Set(req.audience.to_string()),
            class_id: Set(class_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to create announcement: {e}"))
        })?;

        Ok(result.into_announcement())
    }

    pub async fn get_announcement_by_id_impl(
        &self,
        announcement_id: i64,
    ) -> Result<Option<Announcement>> {
        let result = Announcements::find_by_id(announcement_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to load announcement: {e}"))
            })?;

        Ok(result.map(|m| m.into_announcement()))
    }

    /// Avis visibles du lecteur, du plus récent au plus ancien
    pub async fn list_announcements_impl(
        &self,
        visibility: AnnouncementVisibility,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<AnnouncementListResponse> {
        let (page, size) = page_window(page, size);

        let mut select = Announcements::find();
        if let Some(audiences) = visibility.audiences {
            let mut cond = Condition::any().add(
                Column::Audience.is_in(audiences.iter().map(|a| a.to_string())),
            );
            if !visibility.class_ids.is_empty() {
                cond = cond.add(
                    Condition::all()
                        .add(Column::Audience.eq(Audience::Classe.as_str()))
                        .add(Column::ClassId.is_in(visibility.class_ids.iter().copied())),
                );
            }
            if let Some(author_id) = visibility.author_id {
                cond = cond.add(Column::AuthorId.eq(author_id));
            }
            select = select.filter(cond);
        }
        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count announcements: {e}"))
        })?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to count pages: {e}")))?;
        let items = paginator.fetch_page(page - 1).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to list announcements: {e}"))
        })?;

        let author_ids: Vec<i64> = items.iter().map(|a| a.author_id).collect();
        let authors: HashMap<i64, (String, String)> = Users::find()
            .filter(UserColumn::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load authors: {e}")))?
            .into_iter()
            .map(|u| (u.id, (u.first_name, u.last_name)))
            .collect();

        Ok(AnnouncementListResponse {
            items: items
                .into_iter()
                .map(|m| {
                    let (first, last) = authors.get(&m.author_id).cloned().unwrap_or_default();
                    AnnouncementWithAuthor {
                        announcement: m.into_announcement(),
                        author_first_name: first,
                        author_last_name: last,
                    }
                })
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn delete_announcement_impl(&self, announcement_id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(announcement_id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to delete announcement: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{fixture, seed_class};

    fn avis(author_id: i64, title: &str, audience: Audience, class_id: Option<i64>) -> NewAnnouncement {
        NewAnnouncement {
            author_id,
            title: title.to_string(),
            content: "…".into(),
            audience,
            class_id,
        }
    }

    #[tokio::test]
    async fn test_visibility_filter() {
        let fx = fixture().await;
        let other = seed_class(&fx.storage, "Autre").await;
        let s = &fx.storage;
        for a in [
            avis(fx.admin.id, "Rentrée", Audience::Tous, None),
            avis(fx.admin.id, "Conseil", Audience::Profs, None),
            avis(fx.admin.id, "Photo", Audience::Eleves, None),
            avis(fx.prof.id, "Sortie", Audience::Classe, Some(fx.class.id)),
            avis(fx.admin.id, "Voyage", Audience::Classe, Some(other.id)),
        ] {
            s.create_announcement_impl(a).await.expect("create");
        }

        let titles = |r: AnnouncementListResponse| -> Vec<String> {
            let mut t: Vec<String> = r.items.into_iter().map(|i| i.announcement.title).collect();
            t.sort();
            t
        };

        let student_view = s
            .list_announcements_impl(
                AnnouncementVisibility {
                    audiences: Some(vec![Audience::Tous, Audience::Eleves]),
                    class_ids: vec![fx.class.id],
                    author_id: None,
                },
                None,
                None,
            )
            .await
            .expect("list");
        assert_eq!(titles(student_view), vec!["Photo", "Rentrée", "Sortie"]);

        let admin_view = s
            .list_announcements_impl(AnnouncementVisibility::default(), None, None)
            .await
            .expect("list");
        assert_eq!(admin_view.pagination.total, 5);
        assert_eq!(admin_view.items[0].author_last_name, fx.admin.last_name);
    }
}
