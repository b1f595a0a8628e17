use super::entities::TeachingDetail;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teaching.ts")]
pub struct TeachingListResponse {
    pub items: Vec<TeachingDetail>,
}
