use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Affectation d'un professeur à une (classe, matière)
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teaching.ts")]
pub struct Teaching {
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Affectation avec les libellés, pour l'écran d'administration
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teaching.ts")]
pub struct TeachingDetail {
    pub id: i64,
    pub teacher_id: i64,
    pub teacher_name: String,
    pub class_id: i64,
    pub class_name: String,
    pub subject_id: i64,
    pub subject_name: String,
}
