pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod classes;
pub mod courses;
pub mod events;
pub mod files;
pub mod frontend;
pub mod messages;
pub mod quizzes;
pub mod submissions;
pub mod teachings;
pub mod users;

pub use announcements::configure_announcements_routes;
pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use classes::{configure_classes_routes, configure_subjects_routes};
pub use courses::configure_courses_routes;
pub use events::configure_events_routes;
pub use files::configure_file_routes;
pub use frontend::configure_frontend_routes;
pub use messages::configure_messages_routes;
pub use quizzes::configure_quizzes_routes;
pub use submissions::configure_submissions_routes;
pub use teachings::configure_teachings_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// Toutes les routes de l'API, puis le client en dernier (il capture le reste)
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_classes_routes)
        .configure(configure_subjects_routes)
        .configure(configure_teachings_routes)
        .configure(configure_courses_routes)
        .configure(configure_assignments_routes)
        .configure(configure_submissions_routes)
        .configure(configure_quizzes_routes)
        .configure(configure_announcements_routes)
        .configure(configure_events_routes)
        .configure(configure_messages_routes)
        .configure(configure_file_routes)
        .configure(configure_frontend_routes);
}
