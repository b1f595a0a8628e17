use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub level: Option<String>,
}
