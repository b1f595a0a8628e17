pub mod create;
pub mod detail;
pub mod grade;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::{
    entities::Submission,
    requests::{CreateSubmissionRequest, GradeSubmissionRequest, UpdateSubmissionRequest},
};
use crate::models::ErrorCode;
use crate::services::guards::{Guarded, found};
use crate::storage::Storage;

declare_service!(SubmissionService);

impl SubmissionService {
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        payload: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, payload).await
    }

    pub async fn update_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        payload: UpdateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_submission(self, request, submission_id, payload).await
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, submission_id).await
    }

    pub async fn list_for_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_for_assignment(self, request, assignment_id).await
    }

    pub async fn list_mine(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_mine(self, request).await
    }

    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        payload: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, request, submission_id, payload).await
    }
}

pub(crate) async fn load_submission(
    storage: &Arc<dyn Storage>,
    submission_id: i64,
) -> Guarded<Submission> {
    found(
        storage.get_submission_by_id(submission_id).await,
        ErrorCode::SubmissionNotFound,
        "Soumission introuvable",
    )
}
