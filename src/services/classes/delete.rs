use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::guards::{conflict, db, found};

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let class = try_respond!(found(
        storage.get_class_by_id(class_id).await,
        ErrorCode::ClassNotFound,
        "Classe introuvable",
    ));

    let students = try_respond!(db(storage.count_students_in_class(class.id).await));
    if students > 0 {
        return Ok(conflict(
            ErrorCode::ClassNotEmpty,
            format!("La classe compte encore {students} élève(s)"),
        ));
    }

    try_respond!(db(storage.delete_class(class.id).await));
    tracing::info!("Class {} deleted", class.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Classe supprimée")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::request_as;
    use crate::storage::sea_orm_storage::test_support::{fixture, seed_class};
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_class_with_students_is_kept() {
        let f = fixture().await;
        let empty = seed_class(&f.storage, "6e B").await;
        let storage = f.shared();
        let req = request_as(&storage, &f.admin);
        let service = ClassService::new_lazy();

        let resp = delete_class(&service, &req, f.class.id).await.expect("response");
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = delete_class(&service, &req, empty.id).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(storage.get_class_by_id(empty.id).await.expect("load").is_none());
    }
}
