use serde::Serialize;
use ts_rs::TS;

/// Pièce jointe téléversée
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct FileUploadResponse {
    /// Jeton à joindre à un cours ou une soumission
    pub file_token: String,
    pub original_name: String,
    /// Taille (octets)
    pub size: i64,
    pub content_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
