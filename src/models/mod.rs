pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod classes;
pub mod common;
pub mod courses;
pub mod events;
pub mod files;
pub mod messages;
pub mod quizzes;
pub mod subjects;
pub mod submissions;
pub mod teachings;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo};

/// Instant de démarrage du processus, partagé via `app_data`
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
