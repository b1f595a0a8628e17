//! Entité fichier

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub user_id: i64,
    pub uploaded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_file(self) -> crate::models::files::entities::File {
        crate::models::files::entities::File {
            token: self.token,
            original_name: self.original_name,
            stored_name: self.stored_name,
            file_size: self.file_size,
            file_type: self.file_type,
            user_id: self.user_id,
            uploaded_at: super::ts(self.uploaded_at),
        }
    }
}
