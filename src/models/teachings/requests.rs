use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teaching.ts")]
pub struct CreateTeachingRequest {
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teaching.ts")]
pub struct TeachingListQuery {
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
}
