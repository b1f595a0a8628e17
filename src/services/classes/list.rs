use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{ApiResponse, classes::responses::ClassListResponse};
use crate::services::guards::db;

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let items = try_respond!(db(storage.list_classes().await));
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassListResponse { items },
        "Liste des classes",
    )))
}
