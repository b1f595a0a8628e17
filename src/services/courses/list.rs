use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{
    ApiResponse, PaginationInfo,
    courses::{
        requests::{CourseListParams, CourseListQuery},
        responses::CourseListResponse,
    },
    users::entities::UserRole,
};
use crate::services::guards::{current_user, db};

pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    params: CourseListParams,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let mut query = CourseListQuery {
        page: params.page,
        size: params.size,
        teacher_id: None,
        class_id: params.class_id,
        subject_id: params.subject_id,
    };
    match user.role {
        UserRole::Admin => {}
        UserRole::Prof => query.teacher_id = Some(user.id),
        UserRole::Eleve => match user.class_id {
            Some(class_id) => query.class_id = Some(class_id),
            None => {
                return Ok(HttpResponse::Ok().json(ApiResponse::success(
                    CourseListResponse {
                        items: Vec::new(),
                        pagination: PaginationInfo::new(1, 0, 0, 0),
                    },
                    "Liste des cours",
                )));
            }
        },
    }

    let storage = service.get_storage(request)?;
    let courses = try_respond!(db(storage.list_courses_with_pagination(query).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success(courses, "Liste des cours")))
}
