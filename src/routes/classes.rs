use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classes::requests::{CreateClassRequest, UpdateClassRequest};
use crate::models::subjects::requests::SubjectRequest;
use crate::models::users::entities::UserRole;
use crate::services::{ClassService, SubjectService};
use crate::utils::SafeIDI64;

static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);
static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

pub async fn list_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

pub async fn update_class(
    req: HttpRequest,
    class_id: SafeIDI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, class_id.0, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req, class_id.0).await
}

pub async fn list_students(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_students(&req, class_id.0).await
}

pub async fn list_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(&req).await
}

pub async fn create_subject(
    req: HttpRequest,
    payload: web::Json<SubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .create_subject(&req, payload.into_inner())
        .await
}

pub async fn update_subject(
    req: HttpRequest,
    subject_id: SafeIDI64,
    payload: web::Json<SubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(&req, subject_id.0, payload.into_inner())
        .await
}

pub async fn delete_subject(req: HttpRequest, subject_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.delete_subject(&req, subject_id.0).await
}

pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_class))
                    .route(
                        web::put()
                            .to(update_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                // le service vérifie que le prof enseigne dans la classe
                web::resource("/{id}/students").route(
                    web::get()
                        .to(list_students)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            ),
    );
}

pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/matieres")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_subjects)).route(
                    web::post()
                        .to(create_subject)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
