use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct SendMessageRequest {
    pub recipient_id: i64,
    pub content: String,
}

/// Le client interroge toutes les 5 s avec le dernier id reçu
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ConversationQuery {
    pub after_id: Option<i64>,
}
