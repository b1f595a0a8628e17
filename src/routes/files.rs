use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::FileService;
use crate::utils::SafeFileToken;

static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn handle_upload(
    request: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.handle_upload(&request, payload).await
}

pub async fn handle_download(
    request: HttpRequest,
    file_token: SafeFileToken,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.handle_download(&request, file_token.0).await
}

pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/upload")
            .wrap(middlewares::RateLimit::file_upload())
            .wrap(middlewares::RequireJWT)
            .route(web::post().to(handle_upload)),
    )
    .service(
        web::resource("/api/files/{token}")
            .wrap(middleware::Compress::default())
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(handle_download)),
    );
}
