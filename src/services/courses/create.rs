use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{ApiResponse, courses::requests::CreateCourseRequest};
use crate::services::guards::{
    blank_to_none, clean_title, current_user, db, ensure_class_and_subject, ensure_file_owned,
    ensure_teaches,
};

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    mut payload: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    payload.title = try_respond!(clean_title(&payload.title));
    payload.file_token = blank_to_none(payload.file_token);

    let storage = service.get_storage(request)?;
    try_respond!(ensure_class_and_subject(&storage, payload.class_id, payload.subject_id).await);
    try_respond!(ensure_teaches(&storage, &user, payload.class_id, Some(payload.subject_id)).await);
    try_respond!(ensure_file_owned(&storage, user.id, payload.file_token.as_deref()).await);

    let course = try_respond!(db(storage.create_course(user.id, payload).await));
    tracing::info!("Course {} created by {}", course.id, user.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(course, "Cours publié")))
}
