use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeachingService;
use crate::models::{
    ApiResponse, ErrorCode, teachings::requests::CreateTeachingRequest,
    users::entities::UserRole,
};
use crate::services::guards::{bad_request, ensure_class_and_subject, found, written};

pub async fn create_teaching(
    service: &TeachingService,
    request: &HttpRequest,
    payload: CreateTeachingRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let teacher = try_respond!(found(
        storage.get_user_by_id(payload.teacher_id).await,
        ErrorCode::UserNotFound,
        "Utilisateur introuvable",
    ));
    if teacher.role != UserRole::Prof {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Seul un professeur peut recevoir un enseignement",
        ));
    }
    try_respond!(ensure_class_and_subject(&storage, payload.class_id, payload.subject_id).await);

    let teaching = try_respond!(written(
        storage
            .create_teaching(teacher.id, payload.class_id, payload.subject_id)
            .await,
        ErrorCode::TeachingAlreadyExists,
    ));

    tracing::info!(
        "Teacher {} now teaches subject {} in class {}",
        teacher.id,
        payload.subject_id,
        payload.class_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(teaching, "Enseignement ajouté")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::request_as;
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_create_teaching_rules() {
        let f = fixture().await;
        let storage = f.shared();
        let req = request_as(&storage, &f.admin);
        let service = TeachingService::new_lazy();

        // déjà lié par le jeu d'essai
        let resp = create_teaching(
            &service,
            &req,
            CreateTeachingRequest {
                teacher_id: f.prof.id,
                class_id: f.class.id,
                subject_id: f.subject.id,
            },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = create_teaching(
            &service,
            &req,
            CreateTeachingRequest {
                teacher_id: f.student.id,
                class_id: f.class.id,
                subject_id: f.subject.id,
            },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = create_teaching(
            &service,
            &req,
            CreateTeachingRequest {
                teacher_id: f.prof.id,
                class_id: 404,
                subject_id: f.subject.id,
            },
        )
        .await
        .expect("response");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
