use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
}

/// Filtres résolus par le service selon le rôle du lecteur
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub file_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub file_token: Option<String>,
}
