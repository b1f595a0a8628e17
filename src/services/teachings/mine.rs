use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeachingService;
use crate::models::{
    ApiResponse, subjects::responses::SubjectListResponse, classes::entities::Class,
};
use crate::services::guards::{current_user, db};

/// Classes où le prof courant enseigne au moins une matière
pub async fn my_classes(
    service: &TeachingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let classes: Vec<Class> = try_respond!(db(storage.list_teacher_classes(user.id).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success(classes, "Mes classes")))
}

pub async fn my_subjects(
    service: &TeachingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let items = try_respond!(db(storage.list_teacher_subjects(user.id).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubjectListResponse { items },
        "Mes matières",
    )))
}
