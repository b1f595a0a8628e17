use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::messages::requests::{ConversationQuery, SendMessageRequest};
use crate::models::users::entities::UserRole;
use crate::services::MessageService;
use crate::utils::SafeIDI64;

static MESSAGE_SERVICE: Lazy<MessageService> = Lazy::new(MessageService::new_lazy);

pub async fn send_message(
    req: HttpRequest,
    payload: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.send_message(&req, payload.into_inner()).await
}

pub async fn list_contacts(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.list_contacts(&req).await
}

pub async fn conversation(
    req: HttpRequest,
    other_id: SafeIDI64,
    query: web::Query<ConversationQuery>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE
        .conversation(&req, other_id.0, query.into_inner())
        .await
}

pub async fn unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.unread_count(&req).await
}

pub fn configure_messages_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/messages")
            .wrap(middlewares::RequireRole::new_any(UserRole::messaging_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(send_message))
            .route("/contacts", web::get().to(list_contacts))
            .route("/with/{id}", web::get().to(conversation))
            .route("/unread", web::get().to(unread_count)),
    );
}
