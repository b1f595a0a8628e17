use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectRequest {
    pub name: String,
}
