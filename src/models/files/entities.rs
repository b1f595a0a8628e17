use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct File {
    // jeton de téléchargement
    pub token: String,
    // nom d'origine côté client
    pub original_name: String,
    // nom sur disque
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    // taille en octets
    pub file_size: i64,
    pub file_type: String,
    pub user_id: i64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
