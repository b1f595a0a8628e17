use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, load_course};
use crate::models::{ApiResponse, ErrorCode, courses::requests::UpdateCourseRequest};
use crate::services::guards::{
    clean_title, current_user, db, ensure_author, ensure_file_owned, found,
};

pub async fn update_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    mut payload: UpdateCourseRequest,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    if let Some(title) = &payload.title {
        payload.title = Some(try_respond!(clean_title(title)));
    }
    payload.file_token = payload.file_token.map(|t| t.trim().to_string());

    let storage = service.get_storage(request)?;
    let course = try_respond!(load_course(&storage, course_id).await);
    try_respond!(ensure_author(&user, course.teacher_id));
    // l'admin qui retouche un cours ne joint que des fichiers de son auteur
    try_respond!(
        ensure_file_owned(&storage, course.teacher_id, payload.file_token.as_deref()).await
    );

    let course = try_respond!(found(
        storage.update_course(course.id, payload).await,
        ErrorCode::CourseNotFound,
        "Cours introuvable",
    ));
    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Cours mis à jour")))
}

pub async fn delete_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let user = try_respond!(current_user(request));
    let storage = service.get_storage(request)?;
    let course = try_respond!(load_course(&storage, course_id).await);
    try_respond!(ensure_author(&user, course.teacher_id));

    try_respond!(db(storage.delete_course(course.id).await));
    tracing::info!("Course {} deleted by {}", course.id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Cours supprimé")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::files::entities::File;
    use crate::services::test_support::request_as;
    use crate::storage::sea_orm_storage::test_support::fixture;
    use actix_web::http::StatusCode;

    fn file_of(token: &str, user_id: i64) -> File {
        File {
            token: token.to_string(),
            original_name: "support.pdf".into(),
            stored_name: format!("{token}.pdf"),
            file_size: 12,
            file_type: "application/pdf".into(),
            user_id,
            uploaded_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_admin_attaches_files_of_the_author() {
        let f = fixture().await;
        let course = f
            .storage
            .create_course_impl(
                f.prof.id,
                CreateCourseRequest {
                    class_id: f.class.id,
                    subject_id: f.subject.id,
                    title: "Le subjonctif".into(),
                    content: String::new(),
                    file_token: None,
                },
            )
            .await
            .expect("course");
        f.storage
            .upload_file_impl(file_of("fichierprof", f.prof.id))
            .await
            .expect("prof file");
        f.storage
            .upload_file_impl(file_of("fichieradmin", f.admin.id))
            .await
            .expect("admin file");
        let storage = f.shared();
        let req = request_as(&storage, &f.admin);
        let service = CourseService::new_lazy();

        let attach = |token: &str| UpdateCourseRequest {
            file_token: Some(token.to_string()),
            ..Default::default()
        };

        let resp = update_course(&service, &req, course.id, attach("fichieradmin"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = update_course(&service, &req, course.id, attach("fichierprof"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let stored = f
            .storage
            .get_course_by_id_impl(course.id)
            .await
            .expect("lookup")
            .expect("course");
        assert_eq!(stored.file_token.as_deref(), Some("fichierprof"));
    }
}
