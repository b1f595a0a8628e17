use serde::Deserialize;
use ts_rs::TS;

use super::entities::UserRole;

/// Filtres de la liste des comptes (administration)
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub class_id: Option<i64>,
    pub is_active: Option<bool>,
    /// Identifiant, nom, prénom ou e-mail
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// Obligatoire pour un élève
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub class_id: Option<i64>,
    pub is_active: Option<bool>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CredentialSheetQuery {
    pub class_id: Option<i64>,
}
