use super::entities::{User, UserRole};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

/// Identifiants en clair, renvoyés une seule fois à l'administrateur
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserCredentials {
    pub user_id: i64,
    pub login_code: String,
    pub password: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserResponse {
    pub user: User,
    pub credentials: UserCredentials,
}

/// Ligne de la fiche d'identifiants à imprimer
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CredentialSheetEntry {
    pub user_id: i64,
    pub login_code: String,
    pub initial_password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub class_id: Option<i64>,
}
