//! Couche métier : un service par domaine, une opération par fichier.
//!
//! Les handlers renvoient toujours `Ok(HttpResponse)` ; un refus métier est une
//! réponse `ApiResponse` d'erreur, pas une `Err` actix.

/// Déballe un `Result<T, HttpResponse>` ou renvoie la réponse d'erreur.
macro_rules! try_respond {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return Ok(response),
        }
    };
}

/// Déclare un service sans état propre : stockage injecté ou lu dans la requête.
macro_rules! declare_service {
    ($name:ident) => {
        pub struct $name {
            storage: Option<std::sync::Arc<dyn crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> actix_web::Result<std::sync::Arc<dyn crate::storage::Storage>> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => crate::services::storage_from_request(request),
                }
            }
        }
    };
}

pub(crate) mod guards;

pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod classes;
pub mod courses;
pub mod events;
pub mod files;
pub mod messages;
pub mod quizzes;
pub mod subjects;
pub mod submissions;
pub mod teachings;
pub mod users;

pub use announcements::AnnouncementService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use courses::CourseService;
pub use events::EventService;
pub use files::FileService;
pub use messages::MessageService;
pub use quizzes::QuizService;
pub use subjects::SubjectService;
pub use submissions::SubmissionService;
pub use teachings::TeachingService;
pub use users::UserService;

use actix_web::{HttpRequest, Result as ActixResult, web};
use std::sync::Arc;

use crate::storage::Storage;

/// Stockage partagé via `app_data`
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            tracing::error!("Storage not found in app data");
            actix_web::error::ErrorInternalServerError("Storage not found in app data")
        })
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::{HttpMessage, HttpRequest, HttpResponse, body::MessageBody, test::TestRequest};
    use serde_json::Value;
    use std::sync::Arc;

    use crate::models::users::entities::User;
    use crate::storage::Storage;

    /// Requête authentifiée comme `user`, avec le stockage en `app_data`
    pub fn request_as(storage: &Arc<dyn Storage>, user: &User) -> HttpRequest {
        let req = TestRequest::default()
            .app_data(actix_web::web::Data::new(storage.clone()))
            .to_http_request();
        req.extensions_mut().insert(user.clone());
        req
    }

    /// Corps JSON d'une réponse de service
    pub fn body_json(response: HttpResponse) -> Value {
        let bytes = response
            .into_body()
            .try_into_bytes()
            .unwrap_or_default();
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }
}
