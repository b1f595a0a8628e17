pub mod login;
pub mod logout;
pub mod password;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::models::auth::requests::{ChangePasswordRequest, LoginRequest};

declare_service!(AuthService);

impl AuthService {
    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    pub async fn logout(&self) -> ActixResult<HttpResponse> {
        logout::handle_logout().await
    }

    /// Compte courant, relu en base pour l'état du mot de passe provisoire
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }

    pub async fn change_password(
        &self,
        request: &HttpRequest,
        change: ChangePasswordRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_change_password(self, request, change).await
    }
}
