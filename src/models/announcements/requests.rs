use serde::Deserialize;
use ts_rs::TS;

use super::entities::Audience;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    pub audience: Audience,
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}
