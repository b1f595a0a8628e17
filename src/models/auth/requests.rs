use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// Identifiant attribué à la création du compte
    pub login_code: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
