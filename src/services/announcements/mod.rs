//! Avis : publication par l'administration (tout public) ou par un
//! professeur (une classe où il enseigne), lecture filtrée selon le rôle.

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{
        entities::{Announcement, AnnouncementVisibility, Audience, NewAnnouncement},
        requests::{AnnouncementListParams, CreateAnnouncementRequest},
    },
    users::entities::{User, UserRole},
};
use crate::services::guards::{
    Guarded, bad_request, clean_title, current_user, db, ensure_author, ensure_teaches, forbidden,
    found,
};
use crate::storage::Storage;

declare_service!(AnnouncementService);

impl AnnouncementService {
    pub async fn list_announcements(
        &self,
        request: &HttpRequest,
        params: AnnouncementListParams,
    ) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let storage = self.get_storage(request)?;
        let visibility = try_respond!(visibility_for(&storage, &user).await);

        let page = try_respond!(db(storage
            .list_announcements(visibility, params.page, params.size)
            .await));
        Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Liste des avis")))
    }

    pub async fn create_announcement(
        &self,
        request: &HttpRequest,
        payload: CreateAnnouncementRequest,
    ) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let title = try_respond!(clean_title(&payload.title));
        let content = payload.content.trim().to_string();
        if content.is_empty() {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Le contenu de l'avis est vide",
            ));
        }

        let storage = self.get_storage(request)?;
        let class_id = try_respond!(target_class(&storage, &user, &payload).await);

        let announcement = try_respond!(db(storage
            .create_announcement(NewAnnouncement {
                author_id: user.id,
                title,
                content,
                audience: payload.audience,
                class_id,
            })
            .await));
        tracing::info!(
            "Announcement {} published by {} for {}",
            announcement.id,
            user.id,
            announcement.audience
        );
        Ok(HttpResponse::Created().json(ApiResponse::success(announcement, "Avis publié")))
    }

    pub async fn delete_announcement(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
    ) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let storage = self.get_storage(request)?;
        let announcement: Announcement = try_respond!(found(
            storage.get_announcement_by_id(announcement_id).await,
            ErrorCode::AnnouncementNotFound,
            "Avis introuvable",
        ));
        try_respond!(ensure_author(&user, announcement.author_id));

        try_respond!(db(storage.delete_announcement(announcement.id).await));
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Avis supprimé")))
    }
}

async fn visibility_for(storage: &Arc<dyn Storage>, user: &User) -> Guarded<AnnouncementVisibility> {
    Ok(match user.role {
        UserRole::Admin => AnnouncementVisibility::default(),
        UserRole::Prof => {
            let classes = db(storage.list_teacher_classes(user.id).await)?;
            AnnouncementVisibility {
                audiences: Some(vec![Audience::Tous, Audience::Profs]),
                class_ids: classes.into_iter().map(|c| c.id).collect(),
                author_id: Some(user.id),
            }
        }
        UserRole::Eleve => AnnouncementVisibility {
            audiences: Some(vec![Audience::Tous, Audience::Eleves]),
            class_ids: user.class_id.into_iter().collect(),
            author_id: None,
        },
    })
}

/// Classe visée ; `None` pour les publics larges
async fn target_class(
    storage: &Arc<dyn Storage>,
    user: &User,
    payload: &CreateAnnouncementRequest,
) -> Guarded<Option<i64>> {
    if payload.audience != Audience::Classe {
        if !user.is_admin() {
            return Err(forbidden(
                ErrorCode::Forbidden,
                "Un professeur ne peut publier que pour une de ses classes",
            ));
        }
        return Ok(None);
    }

    let Some(class_id) = payload.class_id else {
        return Err(bad_request(
            ErrorCode::ValidationFailed,
            "Indiquez la classe concernée",
        ));
    };
    found(
        storage.get_class_by_id(class_id).await,
        ErrorCode::ClassNotFound,
        "Classe introuvable",
    )?;
    ensure_teaches(storage, user, class_id, None).await?;
    Ok(Some(class_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::{fixture, seed_class};
    use actix_web::http::StatusCode;

    fn avis(audience: Audience, class_id: Option<i64>) -> CreateAnnouncementRequest {
        CreateAnnouncementRequest {
            title: "Sortie au musée".into(),
            content: "Départ 8h devant le collège".into(),
            audience,
            class_id,
        }
    }

    #[tokio::test]
    async fn test_prof_limited_to_taught_classes() {
        let f = fixture().await;
        let other = seed_class(&f.storage, "3e B").await;
        let storage = f.shared();
        let req = request_as(&storage, &f.prof);
        let service = AnnouncementService::new_lazy();

        let resp = service
            .create_announcement(&req, avis(Audience::Tous, None))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = service
            .create_announcement(&req, avis(Audience::Classe, Some(other.id)))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = service
            .create_announcement(&req, avis(Audience::Classe, Some(f.class.id)))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_readers_see_their_audiences() {
        let f = fixture().await;
        let storage = f.shared();
        let service = AnnouncementService::new_lazy();
        let admin = request_as(&storage, &f.admin);
        for audience in [Audience::Tous, Audience::Profs, Audience::Eleves] {
            service
                .create_announcement(&admin, avis(audience, Some(f.class.id)))
                .await
                .expect("response");
        }

        let student = body_json(
            service
                .list_announcements(
                    &request_as(&storage, &f.student),
                    AnnouncementListParams::default(),
                )
                .await
                .expect("response"),
        );
        let audiences: Vec<_> = student["data"]["items"]
            .as_array()
            .expect("items")
            .iter()
            .map(|a| a["audience"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(audiences.len(), 2);
        assert!(!audiences.contains(&"profs".to_string()));
        // un avis général ne garde pas de classe
        assert!(student["data"]["items"][0]["class_id"].is_null());

        let all = body_json(
            service
                .list_announcements(&admin, AnnouncementListParams::default())
                .await
                .expect("response"),
        );
        assert_eq!(all["data"]["pagination"]["total"], 3);
    }
}
