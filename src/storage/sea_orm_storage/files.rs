use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Entity as Files};
use crate::errors::{PortalError, Result};
use crate::models::files::entities::File;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// Enregistre les métadonnées d'un fichier déjà écrit sur disque
    pub async fn upload_file_impl(&self, file: File) -> Result<File> {
        let model = ActiveModel {
            token: Set(file.token),
            original_name: Set(file.original_name),
            stored_name: Set(file.stored_name),
            file_size: Set(file.file_size),
            file_type: Set(file.file_type),
            user_id: Set(file.user_id),
            uploaded_at: Set(file.uploaded_at.timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to record file: {e}")))?;

        Ok(result.into_file())
    }

    pub async fn get_file_by_token_impl(&self, token: &str) -> Result<Option<File>> {
        let result = Files::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to load file: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }
}
