//! Entité classe

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub level: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
    #[sea_orm(has_many = "super::teachings::Entity")]
    Teachings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::teachings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teachings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class(self) -> crate::models::classes::entities::Class {
        crate::models::classes::entities::Class {
            id: self.id,
            name: self.name,
            level: self.level,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
