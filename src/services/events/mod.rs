//! Calendrier de l'établissement : événements généraux ou propres à une classe.

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    events::{
        entities::{Event, EventRange, NewEvent, valid_span},
        requests::{CreateEventRequest, EventListParams, UpdateEventRequest},
        responses::EventListResponse,
    },
    users::entities::{User, UserRole},
};
use crate::services::guards::{
    Guarded, bad_request, blank_to_none, clean_title, current_user, db, ensure_author,
    ensure_teaches, forbidden, found,
};
use crate::storage::Storage;

declare_service!(EventService);

fn invalid_span() -> HttpResponse {
    bad_request(
        ErrorCode::InvalidDateRange,
        "La fin de l'événement doit suivre son début",
    )
}

impl EventService {
    pub async fn list_events(
        &self,
        request: &HttpRequest,
        params: EventListParams,
    ) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        if let (Some(from), Some(to)) = (params.from, params.to)
            && from > to
        {
            return Ok(bad_request(
                ErrorCode::InvalidDateRange,
                "Période invalide",
            ));
        }
        let storage = self.get_storage(request)?;
        let (class_ids, author_id) = try_respond!(visible_classes(&storage, &user).await);

        let items = try_respond!(db(storage
            .list_events(EventRange {
                from: params.from,
                to: params.to,
                class_ids,
                author_id,
            })
            .await));
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            EventListResponse { items },
            "Calendrier",
        )))
    }

    pub async fn create_event(
        &self,
        request: &HttpRequest,
        payload: CreateEventRequest,
    ) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let title = try_respond!(clean_title(&payload.title));
        if !valid_span(payload.start_at, payload.end_at) {
            return Ok(invalid_span());
        }

        let storage = self.get_storage(request)?;
        match payload.class_id {
            Some(class_id) => {
                try_respond!(found(
                    storage.get_class_by_id(class_id).await,
                    ErrorCode::ClassNotFound,
                    "Classe introuvable",
                ));
                try_respond!(ensure_teaches(&storage, &user, class_id, None).await);
            }
            None if !user.is_admin() => {
                return Ok(forbidden(
                    ErrorCode::Forbidden,
                    "Seule l'administration publie des événements pour tout l'établissement",
                ));
            }
            None => {}
        }

        let event = try_respond!(db(storage
            .create_event(NewEvent {
                author_id: user.id,
                title,
                description: blank_to_none(payload.description),
                start_at: payload.start_at,
                end_at: payload.end_at,
                location: blank_to_none(payload.location),
                class_id: payload.class_id,
            })
            .await));
        Ok(HttpResponse::Created().json(ApiResponse::success(event, "Événement ajouté")))
    }

    pub async fn update_event(
        &self,
        request: &HttpRequest,
        event_id: i64,
        mut payload: UpdateEventRequest,
    ) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let storage = self.get_storage(request)?;
        let event = try_respond!(load_event(&storage, event_id).await);
        try_respond!(ensure_author(&user, event.author_id));

        if let Some(title) = &payload.title {
            payload.title = Some(try_respond!(clean_title(title)));
        }
        let start_at = payload.start_at.unwrap_or(event.start_at);
        let end_at = payload.end_at.or(event.end_at);
        if !valid_span(start_at, end_at) {
            return Ok(invalid_span());
        }

        let updated = try_respond!(found(
            storage.update_event(event.id, payload).await,
            ErrorCode::EventNotFound,
            "Événement introuvable",
        ));
        Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Événement mis à jour")))
    }

    pub async fn delete_event(
        &self,
        request: &HttpRequest,
        event_id: i64,
    ) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let storage = self.get_storage(request)?;
        let event = try_respond!(load_event(&storage, event_id).await);
        try_respond!(ensure_author(&user, event.author_id));

        try_respond!(db(storage.delete_event(event.id).await));
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Événement supprimé")))
    }
}

async fn load_event(storage: &Arc<dyn Storage>, event_id: i64) -> Guarded<Event> {
    found(
        storage.get_event_by_id(event_id).await,
        ErrorCode::EventNotFound,
        "Événement introuvable",
    )
}

/// Classes dont le lecteur voit les événements ; `None` pour l'administration
async fn visible_classes(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Guarded<(Option<Vec<i64>>, Option<i64>)> {
    Ok(match user.role {
        UserRole::Admin => (None, None),
        UserRole::Prof => {
            let classes = db(storage.list_teacher_classes(user.id).await)?;
            (
                Some(classes.into_iter().map(|c| c.id).collect()),
                Some(user.id),
            )
        }
        UserRole::Eleve => (Some(user.class_id.into_iter().collect()), None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::{fixture, seed_class};
    use actix_web::http::StatusCode;
    use chrono::{Duration, Utc};

    fn event(class_id: Option<i64>, days: i64) -> CreateEventRequest {
        let start = Utc::now() + Duration::days(days);
        CreateEventRequest {
            title: "Conseil de classe".into(),
            description: None,
            start_at: start,
            end_at: Some(start + Duration::hours(2)),
            location: Some("Salle B12".into()),
            class_id,
        }
    }

    #[tokio::test]
    async fn test_create_rules() {
        let f = fixture().await;
        let storage = f.shared();
        let service = EventService::new_lazy();
        let prof = request_as(&storage, &f.prof);

        let resp = service.create_event(&prof, event(None, 1)).await.expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let mut backwards = event(Some(f.class.id), 1);
        backwards.end_at = Some(backwards.start_at - Duration::minutes(5));
        let resp = service.create_event(&prof, backwards).await.expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service
            .create_event(&prof, event(Some(f.class.id), 1))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_student_sees_global_and_own_class() {
        let f = fixture().await;
        let other = seed_class(&f.storage, "4e C").await;
        let storage = f.shared();
        let service = EventService::new_lazy();
        let admin = request_as(&storage, &f.admin);
        for (class_id, days) in [(None, 3), (Some(f.class.id), 1), (Some(other.id), 2)] {
            service.create_event(&admin, event(class_id, days)).await.expect("response");
        }

        let body = body_json(
            service
                .list_events(&request_as(&storage, &f.student), EventListParams::default())
                .await
                .expect("response"),
        );
        let items = body["data"]["items"].as_array().expect("items");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["class_id"], f.class.id);
        assert!(items[1]["class_id"].is_null());
    }

    #[tokio::test]
    async fn test_update_keeps_span_valid() {
        let f = fixture().await;
        let storage = f.shared();
        let service = EventService::new_lazy();
        let prof = request_as(&storage, &f.prof);
        let created = body_json(
            service
                .create_event(&prof, event(Some(f.class.id), 1))
                .await
                .expect("response"),
        );
        let id = created["data"]["id"].as_i64().expect("id");

        let resp = service
            .update_event(
                &prof,
                id,
                UpdateEventRequest {
                    start_at: Some(Utc::now() + Duration::days(10)),
                    ..Default::default()
                },
            )
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service
            .delete_event(&request_as(&storage, &f.student), id)
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
