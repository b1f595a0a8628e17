use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rôle d'un compte du portail
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,
    Prof,
    Eleve,
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const PROF: &'static str = "prof";
    pub const ELEVE: &'static str = "eleve";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    /// Rôles autorisés à publier du contenu pédagogique
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Prof, &Self::Admin]
    }
    pub fn prof_roles() -> &'static [&'static UserRole] {
        &[&Self::Prof]
    }
    pub fn eleve_roles() -> &'static [&'static UserRole] {
        &[&Self::Eleve]
    }
    pub fn messaging_roles() -> &'static [&'static UserRole] {
        &[&Self::Prof, &Self::Eleve]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Rôle invalide : '{s}'. Rôles possibles : admin, prof, eleve"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Prof => write!(f, "{}", UserRole::PROF),
            UserRole::Eleve => write!(f, "{}", UserRole::ELEVE),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::PROF => Ok(UserRole::Prof),
            UserRole::ELEVE => Ok(UserRole::Eleve),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub login_code: String,
    pub email: Option<String>,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    /// Mot de passe provisoire, visible de l'administration seulement
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub initial_password: Option<String>,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    /// Classe d'un élève ; toujours `None` pour les autres rôles
    pub class_id: Option<i64>,
    pub is_active: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_eleve(&self) -> bool {
        self.role == UserRole::Eleve
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            class_id: self.class_id,
        }
    }
}

/// Vue réduite d'un compte (listes d'élèves, contacts, auteurs)
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub class_id: Option<i64>,
}

/// Ligne à insérer, après génération des identifiants
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login_code: String,
    pub password_hash: String,
    pub initial_password: Option<String>,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub class_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("prof".parse::<UserRole>(), Ok(UserRole::Prof));
        assert!("teacher".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Eleve.to_string(), "eleve");
        let role: UserRole = serde_json::from_str("\"admin\"").expect("role");
        assert_eq!(role, UserRole::Admin);
        assert!(serde_json::from_str::<UserRole>("\"root\"").is_err());
    }
}
