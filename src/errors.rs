//! Erreurs internes du portail.
//!
//! Le type est généré par macro : chaque variante porte un message, un code
//! stable et un libellé de catégorie.

use std::fmt;

/// Génère l'enum d'erreurs, ses accesseurs `code()` / `error_type()` /
/// `message()` et un constructeur en snake case par variante.
macro_rules! define_portal_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum PortalError {
            $($variant(String),)*
        }

        impl PortalError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(PortalError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(PortalError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(PortalError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl PortalError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        PortalError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_portal_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Conflict("E013", "Conflict"),
    PasswordHash("E014", "Password Hash Error"),
}

impl PortalError {
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PortalError {}

impl From<sea_orm::DbErr> for PortalError {
    fn from(err: sea_orm::DbErr) -> Self {
        PortalError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        PortalError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for PortalError {
    fn from(err: chrono::ParseError) -> Self {
        PortalError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PortalError::cache_connection("x").code(), "E001");
        assert_eq!(PortalError::validation("x").code(), "E007");
        assert_eq!(PortalError::conflict("x").code(), "E013");
    }

    #[test]
    fn test_error_type_and_message() {
        let err = PortalError::not_found("Devoir 12");
        assert_eq!(err.error_type(), "Resource Not Found");
        assert_eq!(err.message(), "Devoir 12");
        assert_eq!(err.to_string(), "Resource Not Found: Devoir 12");
    }

    #[test]
    fn test_from_serde_error() {
        let err: PortalError = serde_json::from_str::<i32>("pas un nombre")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E009");
    }
}
