pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::classes::requests::{CreateClassRequest, UpdateClassRequest};

declare_service!(ClassService);

impl ClassService {
    pub async fn list_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_classes(self, request).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, request, class_data).await
    }

    pub async fn get_class(&self, request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, request, class_id).await
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, request, class_id, update_data).await
    }

    /// Refusé tant que la classe compte des élèves
    pub async fn delete_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, request, class_id).await
    }

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        students::list_students(self, request, class_id).await
    }
}

pub(crate) fn check_class_name(name: &str) -> Result<(), actix_web::HttpResponse> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > crate::utils::validate::NAME_MAX_LEN {
        return Err(crate::services::guards::bad_request(
            crate::models::ErrorCode::ValidationFailed,
            "Le nom de la classe est obligatoire (64 caractères maximum)",
        ));
    }
    Ok(())
}
