pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

declare_service!(FileService);

impl FileService {
    /// Un seul champ `file` par requête
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        file_token: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, file_token).await
    }
}
