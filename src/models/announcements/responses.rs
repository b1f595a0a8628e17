use serde::Serialize;
use ts_rs::TS;

use super::entities::Announcement;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementWithAuthor {
    #[serde(flatten)]
    #[ts(flatten)]
    pub announcement: Announcement,
    pub author_first_name: String,
    pub author_last_name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListResponse {
    pub items: Vec<AnnouncementWithAuthor>,
    pub pagination: PaginationInfo,
}
