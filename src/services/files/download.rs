use actix_web::{
    HttpRequest, HttpResponse, Result as ActixResult,
    http::{StatusCode, header},
};
use std::path::Path;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::PortalError;
use crate::models::ErrorCode;
use crate::models::files::entities::File;
use crate::services::guards::{current_user, found, reject};

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let file = try_respond!(found(
        storage.get_file_by_token(&file_token).await,
        ErrorCode::FileNotFound,
        "Fichier introuvable",
    ));

    Ok(serve_stored(Path::new(&AppConfig::get().upload.dir), file))
}

/// Contenu du fichier sous son nom d'origine
pub(crate) fn serve_stored(dir: &Path, file: File) -> HttpResponse {
    let data = match std::fs::read(dir.join(&file.stored_name)) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("File {} is recorded but missing on disk", file.token);
            return reject(
                StatusCode::NOT_FOUND,
                ErrorCode::FileNotFound,
                "Fichier introuvable",
            );
        }
        Err(e) => {
            tracing::error!("{}", PortalError::file_operation(e.to_string()));
            return reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Lecture du fichier impossible",
            );
        }
    };

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.file_type.as_str()))
        .insert_header(header::ContentDisposition::attachment(file.original_name))
        .body(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::files::upload::test_support::{multipart, scratch_dir};
    use crate::services::files::upload::{UploadPolicy, store_upload};
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::body::MessageBody;

    #[tokio::test]
    async fn test_download_keeps_original_name() {
        let f = fixture().await;
        let dir = scratch_dir();
        let allowed = vec!["txt".to_string()];
        let policy = UploadPolicy {
            dir: &dir,
            max_size: 1024,
            allowed_extensions: &allowed,
        };
        let resp = store_upload(
            &f.shared(),
            &policy,
            f.prof.id,
            multipart(&[("file", "Exercices chapitre 3.txt", b"Exercice 1")]),
        )
        .await;
        let token = body_json(resp)["data"]["file_token"]
            .as_str()
            .expect("token")
            .to_string();
        let file = f
            .storage
            .get_file_by_token_impl(&token)
            .await
            .expect("lookup")
            .expect("file row");
        assert_ne!(file.stored_name, file.original_name);

        let resp = serve_stored(&dir, file);
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .expect("disposition")
            .to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("Exercices chapitre 3.txt"));
        let body = resp.into_body().try_into_bytes().expect("body");
        assert_eq!(&body[..], b"Exercice 1");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_recorded_file_missing_on_disk() {
        let f = fixture().await;
        let file = File {
            token: "orphelin".to_string(),
            original_name: "perdu.pdf".to_string(),
            stored_name: "orphelin.pdf".to_string(),
            file_size: 4,
            file_type: "application/pdf".to_string(),
            user_id: f.prof.id,
            uploaded_at: chrono::Utc::now(),
        };
        let resp = serve_stored(&scratch_dir(), file);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let f = fixture().await;
        let req = request_as(&f.shared(), &f.student);
        let resp = handle_download(&FileService::new_lazy(), &req, "inconnu".to_string())
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp)["code"], ErrorCode::FileNotFound.as_i32());
    }
}
