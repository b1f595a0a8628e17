use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    /// secondes
    pub expires_in: i64,
    pub user: User,
    /// Le compte utilise encore le mot de passe provisoire
    pub must_change_password: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
    pub must_change_password: bool,
}
