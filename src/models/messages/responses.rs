use serde::Serialize;
use ts_rs::TS;

use super::entities::Message;
use crate::models::users::entities::UserRole;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct Contact {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub class_id: Option<i64>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ContactListResponse {
    pub items: Vec<Contact>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ConversationResponse {
    pub items: Vec<Message>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct UnreadCountResponse {
    pub unread: i64,
}
