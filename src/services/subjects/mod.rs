use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    subjects::{requests::SubjectRequest, responses::SubjectListResponse},
};
use crate::services::guards::{Guarded, bad_request, db, found, not_found, written};
use crate::utils::validate::NAME_MAX_LEN;

declare_service!(SubjectService);

fn subject_name(payload: &SubjectRequest) -> Guarded<String> {
    let name = payload.name.trim();
    if name.is_empty() || name.chars().count() > NAME_MAX_LEN {
        return Err(bad_request(
            ErrorCode::ValidationFailed,
            "Le nom de la matière est obligatoire (64 caractères maximum)",
        ));
    }
    Ok(name.to_string())
}

// Les matières sont un simple référentiel : les opérations tiennent ici.
impl SubjectService {
    pub async fn list_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let items = try_respond!(db(storage.list_subjects().await));
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectListResponse { items },
            "Liste des matières",
        )))
    }

    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        payload: SubjectRequest,
    ) -> ActixResult<HttpResponse> {
        let name = try_respond!(subject_name(&payload));
        let storage = self.get_storage(request)?;
        let subject = try_respond!(written(
            storage.create_subject(&name).await,
            ErrorCode::NameAlreadyExists,
        ));
        tracing::info!("Subject {} created ({})", subject.id, subject.name);
        Ok(HttpResponse::Created().json(ApiResponse::success(subject, "Matière créée")))
    }

    pub async fn update_subject(
        &self,
        request: &HttpRequest,
        subject_id: i64,
        payload: SubjectRequest,
    ) -> ActixResult<HttpResponse> {
        let name = try_respond!(subject_name(&payload));
        let storage = self.get_storage(request)?;
        match try_respond!(written(
            storage.update_subject(subject_id, &name).await,
            ErrorCode::NameAlreadyExists,
        )) {
            Some(subject) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(subject, "Matière renommée")))
            }
            None => Ok(not_found(ErrorCode::SubjectNotFound, "Matière introuvable")),
        }
    }

    /// Supprime aussi les enseignements et contenus rattachés
    pub async fn delete_subject(
        &self,
        request: &HttpRequest,
        subject_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let subject = try_respond!(found(
            storage.get_subject_by_id(subject_id).await,
            ErrorCode::SubjectNotFound,
            "Matière introuvable",
        ));
        try_respond!(db(storage.delete_subject(subject.id).await));
        tracing::info!("Subject {} deleted", subject.id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Matière supprimée")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::request_as;
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_duplicate_subject_name_conflicts() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.admin);
        let service = SubjectService::new_lazy();

        let resp = service
            .create_subject(&req, SubjectRequest { name: " Français ".into() })
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = service
            .create_subject(&req, SubjectRequest { name: "Histoire".into() })
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = service
            .create_subject(&req, SubjectRequest { name: "  ".into() })
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
