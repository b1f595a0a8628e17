pub mod create;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::{
    entities::Course,
    requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest},
};
use crate::models::ErrorCode;
use crate::services::guards::{Guarded, found};
use crate::storage::Storage;

declare_service!(CourseService);

impl CourseService {
    /// La liste dépend du rôle : classe de l'élève, cours du prof, tout pour l'admin
    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        params: CourseListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, request, params).await
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        payload: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, request, payload).await
    }

    pub async fn get_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        detail::get_course(self, request, course_id).await
    }

    pub async fn update_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        payload: UpdateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, request, course_id, payload).await
    }

    pub async fn delete_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        update::delete_course(self, request, course_id).await
    }
}

pub(crate) async fn load_course(storage: &Arc<dyn Storage>, course_id: i64) -> Guarded<Course> {
    found(
        storage.get_course_by_id(course_id).await,
        ErrorCode::CourseNotFound,
        "Cours introuvable",
    )
}
