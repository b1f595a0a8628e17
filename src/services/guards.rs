//! Contrôles partagés par les services : utilisateur courant, chargement
//! d'une ressource ou 404, droits d'enseignement.

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use std::fmt::Display;
use std::sync::Arc;

use crate::cache::{ObjectCache, user_cache_key};
use crate::errors::{PortalError, Result};
use crate::middlewares::RequireJWT;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::validate_title;

pub(crate) type Guarded<T> = std::result::Result<T, HttpResponse>;

pub(crate) fn reject(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    reject(StatusCode::BAD_REQUEST, code, message)
}

pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    reject(StatusCode::FORBIDDEN, code, message)
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    reject(StatusCode::CONFLICT, code, message)
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    reject(StatusCode::NOT_FOUND, code, message)
}

/// Journalise l'erreur et masque son détail au client
pub(crate) fn internal_error(context: &str, err: impl Display) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    reject(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::InternalServerError,
        "Erreur interne du serveur",
    )
}

pub(crate) fn current_user(request: &HttpRequest) -> Guarded<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        reject(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Authentification requise",
        )
    })
}

/// Résultat de stockage, 500 en cas d'échec
pub(crate) fn db<T>(result: Result<T>) -> Guarded<T> {
    result.map_err(|e| internal_error("Storage operation failed", e))
}

/// Ressource chargée, 404 si absente
pub(crate) fn found<T>(result: Result<Option<T>>, code: ErrorCode, message: &str) -> Guarded<T> {
    match db(result)? {
        Some(value) => Ok(value),
        None => Err(not_found(code, message)),
    }
}

pub(crate) fn is_conflict(err: &PortalError) -> bool {
    matches!(err, PortalError::Conflict(_))
}

/// Écriture soumise à une contrainte d'unicité : 409 avec le message du stockage
pub(crate) fn written<T>(result: Result<T>, code: ErrorCode) -> Guarded<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if is_conflict(&e) => Err(conflict(code, e.message())),
        Err(e) => Err(internal_error("Storage write failed", e)),
    }
}

/// L'admin passe toujours ; un prof doit enseigner la matière dans la classe
/// (ou seulement la classe si `subject_id` est absent).
pub(crate) async fn ensure_teaches(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
    subject_id: Option<i64>,
) -> Guarded<()> {
    let allowed = match user.role {
        UserRole::Admin => true,
        UserRole::Prof => match subject_id {
            Some(subject_id) => db(storage
                .find_teaching(user.id, class_id, subject_id)
                .await)?
            .is_some(),
            None => db(storage.teaches_class(user.id, class_id).await)?,
        },
        UserRole::Eleve => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(forbidden(
            ErrorCode::NotTeachingClass,
            "Vous n'enseignez pas dans cette classe",
        ))
    }
}

/// Lecture d'un contenu de classe : élève de la classe, prof qui y enseigne, admin
pub(crate) async fn ensure_class_reader(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Guarded<()> {
    let allowed = match user.role {
        UserRole::Admin => true,
        UserRole::Eleve => user.class_id == Some(class_id),
        UserRole::Prof => db(storage.teaches_class(user.id, class_id).await)?,
    };
    if allowed {
        Ok(())
    } else {
        Err(forbidden(ErrorCode::Forbidden, "Accès refusé"))
    }
}

/// Auteur du contenu ou admin
pub(crate) fn ensure_author(user: &User, author_id: i64) -> Guarded<()> {
    if user.is_admin() || user.id == author_id {
        Ok(())
    } else {
        Err(forbidden(ErrorCode::Forbidden, "Accès refusé"))
    }
}

/// Classe et matière doivent exister avant toute écriture qui les référence
pub(crate) async fn ensure_class_and_subject(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    subject_id: i64,
) -> Guarded<()> {
    found(
        storage.get_class_by_id(class_id).await,
        ErrorCode::ClassNotFound,
        "Classe introuvable",
    )?;
    found(
        storage.get_subject_by_id(subject_id).await,
        ErrorCode::SubjectNotFound,
        "Matière introuvable",
    )?;
    Ok(())
}

/// Titre nettoyé, 400 s'il est vide ou trop long
pub(crate) fn clean_title(title: &str) -> Guarded<String> {
    validate_title(title).map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))?;
    Ok(title.trim().to_string())
}

/// Un jeton de fichier joint à un contenu doit désigner un envoi de
/// l'auteur de ce contenu
pub(crate) async fn ensure_file_owned(
    storage: &Arc<dyn Storage>,
    owner_id: i64,
    file_token: Option<&str>,
) -> Guarded<()> {
    let Some(token) = file_token.filter(|t| !t.is_empty()) else {
        return Ok(());
    };
    let file = found(
        storage.get_file_by_token(token).await,
        ErrorCode::FileNotFound,
        "Fichier introuvable",
    )?;
    if file.user_id != owner_id {
        return Err(forbidden(
            ErrorCode::Forbidden,
            "Ce fichier n'a pas été envoyé par l'auteur",
        ));
    }
    Ok(())
}

/// Oublie la session en cache d'un compte modifié
pub(crate) async fn forget_session(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&user_cache_key(user_id)).await;
    }
}

/// Champ texte facultatif : chaîne vide pour effacer
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
