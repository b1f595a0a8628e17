//! Messagerie entre un professeur et les élèves des classes où il enseigne.
//!
//! Pas de temps réel : le client interroge la conversation toutes les
//! cinq secondes avec l'identifiant du dernier message reçu.

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    messages::{
        requests::{ConversationQuery, SendMessageRequest},
        responses::{
            Contact, ContactListResponse, ConversationResponse, UnreadCountResponse,
        },
    },
    users::entities::{User, UserRole},
};
use crate::services::guards::{Guarded, bad_request, current_user, db, forbidden, found};
use crate::storage::Storage;

declare_service!(MessageService);

impl MessageService {
    pub async fn send_message(
        &self,
        request: &HttpRequest,
        payload: SendMessageRequest,
    ) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let content = payload.content.trim();
        if content.is_empty() {
            return Ok(bad_request(ErrorCode::ValidationFailed, "Le message est vide"));
        }
        let max_length = AppConfig::get().portal.message_max_length;
        if content.chars().count() > max_length {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                format!("Le message dépasse {max_length} caractères"),
            ));
        }

        let storage = self.get_storage(request)?;
        let recipient = try_respond!(correspondent(&storage, &user, payload.recipient_id).await);
        let message = try_respond!(db(storage
            .create_message(user.id, recipient.id, content)
            .await));
        Ok(HttpResponse::Created().json(ApiResponse::success(message, "Message envoyé")))
    }

    pub async fn list_contacts(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let storage = self.get_storage(request)?;

        let people = match user.role {
            UserRole::Eleve => match user.class_id {
                Some(class_id) => try_respond!(db(storage.list_class_teachers(class_id).await)),
                None => Vec::new(),
            },
            UserRole::Prof => {
                let classes = try_respond!(db(storage.list_teacher_classes(user.id).await));
                let ids: Vec<i64> = classes.into_iter().map(|c| c.id).collect();
                try_respond!(db(storage.list_students_in_classes(&ids).await))
            }
            UserRole::Admin => Vec::new(),
        };
        let unread = try_respond!(db(storage.unread_counts_by_sender(user.id).await));

        let items = people
            .into_iter()
            .map(|person| Contact {
                unread_count: unread.get(&person.id).copied().unwrap_or(0),
                user_id: person.id,
                first_name: person.first_name,
                last_name: person.last_name,
                role: person.role,
                class_id: person.class_id,
            })
            .collect();
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            ContactListResponse { items },
            "Contacts",
        )))
    }

    /// Messages échangés avec `other_id` ; ceux reçus sont marqués lus
    pub async fn conversation(
        &self,
        request: &HttpRequest,
        other_id: i64,
        query: ConversationQuery,
    ) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let storage = self.get_storage(request)?;
        let other = try_respond!(correspondent(&storage, &user, other_id).await);

        let items = try_respond!(db(storage
            .list_conversation(
                user.id,
                other.id,
                query.after_id,
                AppConfig::get().portal.message_page_size,
            )
            .await));
        if items.iter().any(|m| m.recipient_id == user.id && !m.is_read) {
            try_respond!(db(storage.mark_conversation_read(user.id, other.id).await));
        }
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            ConversationResponse { items },
            "Conversation",
        )))
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = try_respond!(current_user(request));
        let storage = self.get_storage(request)?;
        let unread = try_respond!(db(storage.count_unread_messages(user.id).await));
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse { unread },
            "Messages non lus",
        )))
    }
}

/// Interlocuteur autorisé : un prof et un élève d'une classe où il enseigne
async fn correspondent(storage: &Arc<dyn Storage>, user: &User, other_id: i64) -> Guarded<User> {
    let other = found(
        storage.get_user_by_id(other_id).await,
        ErrorCode::UserNotFound,
        "Utilisateur introuvable",
    )?;
    let pair = match (user.role, other.role) {
        (UserRole::Prof, UserRole::Eleve) => Some((user, &other)),
        (UserRole::Eleve, UserRole::Prof) => Some((&other, user)),
        _ => None,
    };
    let allowed = match pair {
        Some((prof, eleve)) if other.is_active => match eleve.class_id {
            Some(class_id) => db(storage.teaches_class(prof.id, class_id).await)?,
            None => false,
        },
        _ => false,
    };
    if !allowed {
        return Err(forbidden(
            ErrorCode::Forbidden,
            "Vous ne pouvez pas échanger de messages avec cet utilisateur",
        ));
    }
    Ok(other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::{fixture, new_user, seed_class};
    use actix_web::http::StatusCode;

    fn message(recipient_id: i64, content: &str) -> SendMessageRequest {
        SendMessageRequest {
            recipient_id,
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn test_only_teacher_student_pairs() {
        let f = fixture().await;
        let other_class = seed_class(&f.storage, "6e D").await;
        let stranger = f
            .storage
            .create_user_impl(new_user("stranger", UserRole::Eleve, Some(other_class.id)))
            .await
            .expect("user");
        let storage = f.shared();
        let service = MessageService::new_lazy();
        let prof = request_as(&storage, &f.prof);

        let resp = service
            .send_message(&prof, message(f.student.id, "Pensez au devoir"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = service
            .send_message(&prof, message(stranger.id, "Bonjour"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = service
            .send_message(&request_as(&storage, &f.student), message(f.admin.id, "Bonjour"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = service
            .send_message(&prof, message(f.student.id, "   "))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_conversation_marks_read_and_polls() {
        let f = fixture().await;
        let storage = f.shared();
        let service = MessageService::new_lazy();
        let prof = request_as(&storage, &f.prof);
        let student = request_as(&storage, &f.student);

        let first = body_json(
            service
                .send_message(&prof, message(f.student.id, "Bonjour"))
                .await
                .expect("response"),
        );
        let first_id = first["data"]["id"].as_i64().expect("id");
        service
            .send_message(&prof, message(f.student.id, "N'oubliez pas le livre"))
            .await
            .expect("response");

        let unread = body_json(service.unread_count(&student).await.expect("response"));
        assert_eq!(unread["data"]["unread"], 2);

        let contacts = body_json(service.list_contacts(&student).await.expect("response"));
        assert_eq!(contacts["data"]["items"][0]["unread_count"], 2);

        let newer = body_json(
            service
                .conversation(
                    &student,
                    f.prof.id,
                    ConversationQuery {
                        after_id: Some(first_id),
                    },
                )
                .await
                .expect("response"),
        );
        assert_eq!(newer["data"]["items"].as_array().map(Vec::len), Some(1));

        let unread = body_json(service.unread_count(&student).await.expect("response"));
        assert_eq!(unread["data"]["unread"], 0);
    }
}
