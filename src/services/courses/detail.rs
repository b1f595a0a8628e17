use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, load_course};
use crate::models::ApiResponse;
use crate::services::guards::{current_user, ensure_class_reader};

pub async fn get_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let course = try_respond!(load_course(&storage, course_id).await);
    if course.teacher_id != user.id {
        try_respond!(ensure_class_reader(&storage, &user, course.class_id).await);
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Cours")))
}
