use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

/// Corps JSON illisible ou incomplet -> 400 au format `ApiResponse`
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid JSON body on {}: {}", req.path(), err);
    let message = match &err {
        JsonPayloadError::ContentType => "Le corps de la requête doit être du JSON".to_string(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Le corps de la requête est trop volumineux".to_string()
        }
        JsonPayloadError::Deserialize(e) => format!("Données invalides : {e}"),
        other => format!("Requête invalide : {other}"),
    };
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid query string on {}: {}", req.path(), err);
    let message = format!("Paramètres de requête invalides : {err}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}
