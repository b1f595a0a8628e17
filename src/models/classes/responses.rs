use super::entities::Class;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassWithCount {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub student_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub items: Vec<ClassWithCount>,
}
