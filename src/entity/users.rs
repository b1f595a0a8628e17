//! Entité utilisateur

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub login_code: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub initial_password: Option<String>,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<i64>,
    pub is_active: bool,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(has_many = "super::files::Entity")]
    Files,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// Conversion vers le modèle métier
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{User, UserRole};

        User {
            id: self.id,
            login_code: self.login_code,
            email: self.email,
            password_hash: self.password_hash,
            initial_password: self.initial_password,
            // rôle inconnu : le moins privilégié
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Eleve),
            first_name: self.first_name,
            last_name: self.last_name,
            class_id: self.class_id,
            is_active: self.is_active,
            last_login: self.last_login.map(super::ts),
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
