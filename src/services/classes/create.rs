use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, check_class_name};
use crate::models::{ApiResponse, ErrorCode, classes::requests::CreateClassRequest};
use crate::services::guards::{blank_to_none, written};

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    try_respond!(check_class_name(&class_data.name));
    let class_data = CreateClassRequest {
        name: class_data.name.trim().to_string(),
        level: blank_to_none(class_data.level),
    };

    let storage = service.get_storage(request)?;
    let class = try_respond!(written(
        storage.create_class(class_data).await,
        ErrorCode::NameAlreadyExists,
    ));

    tracing::info!("Class {} created ({})", class.id, class.name);
    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Classe créée")))
}
