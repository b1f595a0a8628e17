/*!
 * Contrôle d'accès par rôle
 *
 * Toujours placé derrière `RequireJWT`, qui dépose le compte dans la requête.
 *
 * ```rust,ignore
 * web::scope("/api/classes")
 *     .wrap(RequireRole::new_any(UserRole::admin_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<UserRole>,
    // vrai : tous les rôles listés, faux : un seul suffit
    require_all: bool,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self {
            required_roles: vec![*role],
            require_all: true,
        }
    }

    /// Un des rôles suffit
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
            require_all: false,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
            require_all: self.require_all,
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<UserRole>,
    require_all: bool,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();
        let require_all = self.require_all;

        Box::pin(async move {
            let user_role = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role));

            match user_role {
                Some((user_id, role)) => {
                    let has_permission = role_allowed(&required_roles, require_all, role);

                    if has_permission {
                        let res = srv.call(req).await?.map_into_left_body();
                        Ok(res)
                    } else {
                        info!(
                            "Access denied for user {} (role: {}). Required roles: {:?}",
                            user_id, role, required_roles
                        );
                        Ok(req.into_response(
                            create_error_response(
                                StatusCode::FORBIDDEN,
                                ErrorCode::Forbidden,
                                "Accès refusé",
                            )
                            .map_into_right_body(),
                        ))
                    }
                }
                None => {
                    info!(
                        "Role check on {} without an authenticated user; RequireJWT must wrap this scope",
                        req.path()
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentification requise",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

fn role_allowed(required: &[UserRole], require_all: bool, role: UserRole) -> bool {
    if require_all {
        required.iter().all(|r| *r == role)
    } else {
        required.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_allowed() {
        let staff: Vec<UserRole> = UserRole::staff_roles().iter().map(|r| **r).collect();
        assert!(role_allowed(&staff, false, UserRole::Prof));
        assert!(role_allowed(&staff, false, UserRole::Admin));
        assert!(!role_allowed(&staff, false, UserRole::Eleve));
        assert!(role_allowed(&[UserRole::Admin], true, UserRole::Admin));
        assert!(!role_allowed(&[UserRole::Admin], true, UserRole::Prof));
    }
}
