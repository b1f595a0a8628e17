//! Extracteurs de paramètres de chemin validés.
//!
//! Un identifiant mal formé produit directement une réponse 400 au format
//! `ApiResponse`, sans atteindre le service.

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_path_param(format!("Paramètre manquant : {name}")))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_path_param(format!("Identifiant invalide : {raw}"))),
    }
}

/// `{id}` strictement positif
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_positive_id(req, "id").map(SafeIDI64))
    }
}

/// `{token}` de fichier : uuid v4 simple (32 caractères hexadécimaux)
#[derive(Debug, Clone)]
pub struct SafeFileToken(pub String);

pub fn is_valid_file_token(token: &str) -> bool {
    token.len() == 32 && token.chars().all(|c| c.is_ascii_hexdigit())
}

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("token") {
            Some(token) if is_valid_file_token(token) => Ok(SafeFileToken(token.to_string())),
            Some(token) => Err(bad_path_param(format!("Jeton de fichier invalide : {token}"))),
            None => Err(bad_path_param("Paramètre manquant : token".to_string())),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.expect("valid id");
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_zero_and_garbage() {
        let req = TestRequest::default().param("id", "0").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[test]
    fn test_file_token_format() {
        assert!(is_valid_file_token("0123456789abcdef0123456789abcdef"));
        assert!(!is_valid_file_token("../../etc/passwd"));
        assert!(!is_valid_file_token("0123"));
    }
}
