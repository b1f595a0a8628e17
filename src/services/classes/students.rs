use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::users::entities::UserSummary;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::guards::{current_user, db, ensure_teaches, found};

/// Admin, ou prof qui enseigne dans la classe
pub async fn list_students(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let class = try_respond!(found(
        storage.get_class_by_id(class_id).await,
        ErrorCode::ClassNotFound,
        "Classe introuvable",
    ));
    try_respond!(ensure_teaches(&storage, &user, class.id, None).await);

    let students: Vec<UserSummary> = try_respond!(db(storage
        .list_students_in_classes(&[class.id])
        .await))
    .iter()
    .map(|student| student.summary())
    .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(students, "Élèves de la classe")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{body_json, request_as};
    use crate::storage::sea_orm_storage::test_support::{fixture, seed_class};
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_students_visible_to_teaching_prof_only() {
        let f = fixture().await;
        let other = seed_class(&f.storage, "3e C").await;
        let storage = f.shared();
        let service = ClassService::new_lazy();

        let req = request_as(&storage, &f.prof);
        let resp = list_students(&service, &req, f.class.id).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp);
        assert_eq!(body["data"][0]["id"], f.student.id);

        let resp = list_students(&service, &req, other.id).await.expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = request_as(&storage, &f.student);
        let resp = list_students(&service, &req, f.class.id).await.expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
