use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::PortalError;
use crate::models::files::entities::File;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::guards::{Guarded, bad_request, current_user, reject};
use crate::storage::Storage;
use crate::utils::random_code::generate_file_token;
use crate::utils::validate_magic_bytes;

/// Limites d'envoi lues dans `upload.*`
pub(crate) struct UploadPolicy<'a> {
    pub dir: &'a Path,
    pub max_size: usize,
    pub allowed_extensions: &'a [String],
}

impl<'a> UploadPolicy<'a> {
    fn from_config(config: &'a AppConfig) -> Self {
        Self {
            dir: Path::new(&config.upload.dir),
            max_size: config.upload.max_size,
            allowed_extensions: &config.upload.allowed_extensions,
        }
    }
}

/// Fichier écrit sur disque, effacé au drop tant qu'il n'est pas enregistré
pub(crate) struct PendingFile {
    path: PathBuf,
    kept: bool,
}

impl PendingFile {
    fn new(path: PathBuf) -> Self {
        Self { path, kept: false }
    }

    pub(crate) fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.kept
            && let Err(e) = fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}

/// Extension en minuscules si elle figure dans la liste autorisée
pub(crate) fn allowed_extension(file_name: &str, allowed: &[String]) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())?;
    allowed
        .iter()
        .any(|a| a.eq_ignore_ascii_case(&extension))
        .then_some(extension)
}

fn upload_failed(err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}", PortalError::file_operation(err.to_string()));
    reject(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::FileUploadFailed,
        "L'envoi du fichier a échoué",
    )
}

/// Lit l'unique champ `file` et l'écrit sous `policy.dir`.
/// Tout refus laisse le dossier tel qu'il était.
pub(crate) async fn receive_file(
    policy: &UploadPolicy<'_>,
    user_id: i64,
    mut payload: Multipart,
) -> Guarded<(PendingFile, File)> {
    if !policy.dir.exists() {
        fs::create_dir_all(policy.dir).map_err(upload_failed)?;
    }

    let mut received: Option<(PendingFile, File)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if name != "file" {
            continue;
        }
        if received.is_some() {
            return Err(bad_request(
                ErrorCode::BadRequest,
                "Un seul fichier par envoi",
            ));
        }

        let original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();
        let extension = allowed_extension(&original_name, policy.allowed_extensions)
            .ok_or_else(|| {
                bad_request(ErrorCode::FileTypeNotAllowed, "Type de fichier non autorisé")
            })?;
        let file_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let token = generate_file_token();
        let stored_name = format!("{token}.{extension}");
        let file_path = policy.dir.join(&stored_name);
        let mut out = fs::File::create(&file_path).map_err(upload_failed)?;
        let pending = PendingFile::new(file_path);

        let mut total_size: usize = 0;
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| {
                tracing::info!("Upload stream interrupted: {}", e);
                bad_request(ErrorCode::BadRequest, "Envoi interrompu")
            })?;

            if total_size == 0 && !validate_magic_bytes(&data, &extension) {
                return Err(bad_request(
                    ErrorCode::FileTypeNotAllowed,
                    "Le contenu du fichier ne correspond pas à son extension",
                ));
            }

            total_size += data.len();
            if total_size > policy.max_size {
                return Err(reject(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    ErrorCode::FileTooLarge,
                    format!(
                        "Le fichier dépasse la taille maximale ({} octets)",
                        policy.max_size
                    ),
                ));
            }
            out.write_all(&data).map_err(upload_failed)?;
        }

        if total_size == 0 {
            return Err(bad_request(ErrorCode::BadRequest, "Le fichier est vide"));
        }

        received = Some((
            pending,
            File {
                token,
                original_name,
                stored_name,
                file_size: total_size as i64,
                file_type,
                user_id,
                uploaded_at: chrono::Utc::now(),
            },
        ));
    }

    received.ok_or_else(|| bad_request(ErrorCode::BadRequest, "Aucun fichier dans la requête"))
}

pub(crate) async fn store_upload(
    storage: &Arc<dyn Storage>,
    policy: &UploadPolicy<'_>,
    user_id: i64,
    payload: Multipart,
) -> HttpResponse {
    let (pending, file) = match receive_file(policy, user_id, payload).await {
        Ok(received) => received,
        Err(response) => return response,
    };

    match storage.upload_file(file).await {
        Ok(file) => {
            pending.keep();
            tracing::info!("File {} uploaded by {}", file.token, user_id);
            HttpResponse::Created().json(ApiResponse::success(
                FileUploadResponse {
                    file_token: file.token,
                    original_name: file.original_name,
                    size: file.file_size,
                    content_type: file.file_type,
                    uploaded_at: file.uploaded_at,
                },
                "Fichier envoyé",
            ))
        }
        Err(e) => upload_failed(e),
    }
}

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(req));
    let storage = service.get_storage(req)?;
    let policy = UploadPolicy::from_config(AppConfig::get());
    Ok(store_upload(&storage, &policy, user.id, payload).await)
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_multipart::Multipart;
    use actix_web::error::PayloadError;
    use actix_web::http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
    use actix_web::web::Bytes;
    use std::path::PathBuf;

    const BOUNDARY: &str = "ecole-boundary";

    /// Dossier d'envoi propre à un test
    pub fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("ecole-upload-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn files_in(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    /// Corps multipart : une partie par `(champ, nom de fichier, contenu)`
    pub fn multipart(parts: &[(&str, &str, &[u8])]) -> Multipart {
        let mut body = Vec::new();
        for (field, filename, content) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                     filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&format!("multipart/form-data; boundary={BOUNDARY}"))
                .expect("content type"),
        );
        let stream =
            futures_util::stream::once(async move { Ok::<_, PayloadError>(Bytes::from(body)) });
        Multipart::new(&headers, stream)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{files_in, multipart, scratch_dir};
    use super::*;
    use crate::services::test_support::body_json;
    use crate::storage::sea_orm_storage::test_support::fixture;

    const PDF: &[u8] = b"%PDF-1.7\nfiche de revision";

    fn allowed() -> Vec<String> {
        vec!["pdf".to_string(), "png".to_string()]
    }

    #[test]
    fn test_allowed_extension() {
        let allowed = allowed();
        assert_eq!(allowed_extension("Cours.PDF", &allowed), Some("pdf".into()));
        assert_eq!(allowed_extension("schema.png", &allowed), Some("png".into()));
        assert_eq!(allowed_extension("script.sh", &allowed), None);
        assert_eq!(allowed_extension("sans_extension", &allowed), None);
    }

    #[tokio::test]
    async fn test_upload_stores_file_and_returns_metadata() {
        let f = fixture().await;
        let dir = scratch_dir();
        let allowed = allowed();
        let policy = UploadPolicy {
            dir: &dir,
            max_size: 1024,
            allowed_extensions: &allowed,
        };

        let resp = store_upload(
            &f.shared(),
            &policy,
            f.student.id,
            multipart(&[("file", "revision.pdf", PDF)]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp);
        assert_eq!(body["data"]["original_name"], "revision.pdf");
        assert_eq!(body["data"]["size"], PDF.len() as i64);
        let token = body["data"]["file_token"].as_str().expect("token").to_string();

        let stored = f
            .storage
            .get_file_by_token_impl(&token)
            .await
            .expect("lookup")
            .expect("file row");
        assert_eq!(stored.user_id, f.student.id);
        assert_eq!(
            fs::read(dir.join(&stored.stored_name)).expect("on disk"),
            PDF
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_second_file_field_leaves_nothing_on_disk() {
        let f = fixture().await;
        let dir = scratch_dir();
        let allowed = allowed();
        let policy = UploadPolicy {
            dir: &dir,
            max_size: 1024,
            allowed_extensions: &allowed,
        };

        let resp = store_upload(
            &f.shared(),
            &policy,
            f.student.id,
            multipart(&[("file", "a.pdf", PDF), ("file", "b.pdf", PDF)]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(files_in(&dir), 0);
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_oversize_file_is_rejected_and_removed() {
        let f = fixture().await;
        let dir = scratch_dir();
        let allowed = allowed();
        let policy = UploadPolicy {
            dir: &dir,
            max_size: 8,
            allowed_extensions: &allowed,
        };

        let resp = store_upload(
            &f.shared(),
            &policy,
            f.student.id,
            multipart(&[("file", "gros.pdf", PDF)]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(resp)["code"], ErrorCode::FileTooLarge.as_i32());
        assert_eq!(files_in(&dir), 0);
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_content_must_match_extension() {
        let f = fixture().await;
        let dir = scratch_dir();
        let allowed = allowed();
        let policy = UploadPolicy {
            dir: &dir,
            max_size: 1024,
            allowed_extensions: &allowed,
        };

        let resp = store_upload(
            &f.shared(),
            &policy,
            f.student.id,
            multipart(&[("file", "devoir.pdf", b"MZ\x90\x00 executable")]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp)["code"], ErrorCode::FileTypeNotAllowed.as_i32());

        let resp = store_upload(
            &f.shared(),
            &policy,
            f.student.id,
            multipart(&[("file", "script.sh", b"#!/bin/sh")]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(files_in(&dir), 0);
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_request_without_file_field() {
        let f = fixture().await;
        let dir = scratch_dir();
        let allowed = allowed();
        let policy = UploadPolicy {
            dir: &dir,
            max_size: 1024,
            allowed_extensions: &allowed,
        };

        let resp = store_upload(
            &f.shared(),
            &policy,
            f.student.id,
            multipart(&[("piece", "a.pdf", PDF)]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(files_in(&dir), 0);
        let _ = fs::remove_dir_all(&dir);
    }
}
