use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::guards::found;

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let class = try_respond!(found(
        storage.get_class_by_id(class_id).await,
        ErrorCode::ClassNotFound,
        "Classe introuvable",
    ));
    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Classe")))
}
