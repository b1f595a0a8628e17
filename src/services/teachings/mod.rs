pub mod create;
pub mod mine;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    teachings::{
        requests::{CreateTeachingRequest, TeachingListQuery},
        responses::TeachingListResponse,
    },
};
use crate::services::guards::{db, not_found};

declare_service!(TeachingService);

impl TeachingService {
    pub async fn list_teachings(
        &self,
        request: &HttpRequest,
        query: TeachingListQuery,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let items = try_respond!(db(storage.list_teachings(query).await));
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            TeachingListResponse { items },
            "Enseignements",
        )))
    }

    /// Lie un prof à une matière dans une classe
    pub async fn create_teaching(
        &self,
        request: &HttpRequest,
        payload: CreateTeachingRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teaching(self, request, payload).await
    }

    pub async fn delete_teaching(
        &self,
        request: &HttpRequest,
        teaching_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        if !try_respond!(db(storage.delete_teaching(teaching_id).await)) {
            return Ok(not_found(
                ErrorCode::TeachingNotFound,
                "Enseignement introuvable",
            ));
        }
        tracing::info!("Teaching {} removed", teaching_id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enseignement retiré")))
    }

    pub async fn my_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_classes(self, request).await
    }

    pub async fn my_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_subjects(self, request).await
    }
}
