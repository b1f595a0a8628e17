//! Entité matière

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teachings::Entity")]
    Teachings,
}

impl Related<super::teachings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teachings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject(self) -> crate::models::subjects::entities::Subject {
        crate::models::subjects::entities::Subject {
            id: self.id,
            name: self.name,
            created_at: super::ts(self.created_at),
        }
    }
}
