use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // identifiant utilisateur
    pub role: String, // admin | prof | eleve
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::generate_token(
            user_id,
            role,
            TokenKind::Access,
            chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry),
        )
    }

    pub fn generate_token(
        user_id: i64,
        role: &str,
        kind: TokenKind,
        lifetime: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind,
            exp: (now + lifetime).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let secret = Self::secret();
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    /// `remember_me` prolonge la durée du jeton de rafraîchissement
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        remember_me: bool,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let jwt = &AppConfig::get().jwt;
        let refresh_days = if remember_me {
            jwt.refresh_token_remember_me_expiry
        } else {
            jwt.refresh_token_expiry
        };
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_token(
                user_id,
                role,
                TokenKind::Refresh,
                chrono::Duration::days(refresh_days),
            )?,
        })
    }

    fn verify(token: &str, expected: TokenKind) -> Result<Claims, jsonwebtoken::errors::Error> {
        let secret = Self::secret();
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )?
        .claims;
        if claims.token_type != expected {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(token, TokenKind::Refresh)
    }

    pub fn create_refresh_token_cookie(refresh_token: &str, remember_me: bool) -> Cookie<'static> {
        let config = AppConfig::get();
        let days = if remember_me {
            config.jwt.refresh_token_remember_me_expiry
        } else {
            config.jwt.refresh_token_expiry
        };
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/api/auth")
            .max_age(actix_web::cookie::time::Duration::days(days))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    /// Cookie expiré, pour la déconnexion
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, "")
            .path("/api/auth")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_roundtrip_and_kind_check() {
        let pair = JwtUtils::generate_token_pair(12, "prof", false).expect("token pair");
        let claims = JwtUtils::verify_access_token(&pair.access_token).expect("valid access");
        assert_eq!(claims.user_id(), Some(12));
        assert_eq!(claims.role, "prof");

        // un jeton de rafraîchissement n'ouvre pas l'API
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
        assert!(JwtUtils::verify_refresh_token(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = JwtUtils::generate_access_token(3, "eleve").expect("token");
        let tampered = format!("{token}x");
        assert!(JwtUtils::verify_access_token(&tampered).is_err());
    }
}
