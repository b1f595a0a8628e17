pub mod create;
pub mod credentials;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::requests::{
    CreateUserRequest, CredentialSheetQuery, UpdateUserRequest, UserListQuery,
};

declare_service!(UserService);

impl UserService {
    pub async fn list_users(
        &self,
        query: UserListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    /// Identifiant et mot de passe provisoire générés, renvoyés une seule fois
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    pub async fn delete_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }

    pub async fn regenerate_credentials(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        credentials::regenerate_credentials(self, user_id, request).await
    }

    pub async fn credential_sheet(
        &self,
        query: CredentialSheetQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        credentials::credential_sheet(self, query, request).await
    }
}
