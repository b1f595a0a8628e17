use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, check_class_name};
use crate::models::{ApiResponse, ErrorCode, classes::requests::UpdateClassRequest};
use crate::services::guards::{not_found, written};

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = &update_data.name {
        try_respond!(check_class_name(name));
    }
    let update_data = UpdateClassRequest {
        name: update_data.name.map(|n| n.trim().to_string()),
        level: update_data.level.map(|l| l.trim().to_string()),
    };

    let storage = service.get_storage(request)?;
    match try_respond!(written(
        storage.update_class(class_id, update_data).await,
        ErrorCode::NameAlreadyExists,
    )) {
        Some(class) => Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Classe mise à jour"))),
        None => Ok(not_found(ErrorCode::ClassNotFound, "Classe introuvable")),
    }
}
