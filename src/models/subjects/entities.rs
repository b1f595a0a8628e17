use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Matière enseignée
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
