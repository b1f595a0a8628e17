//! Entités SeaORM
//!
//! Miroir des tables, distinct des modèles métier de `models`. La couche
//! storage lit et écrit ces entités puis les convertit via `into_*`.

pub mod prelude;

pub mod announcements;
pub mod assignments;
pub mod classes;
pub mod courses;
pub mod events;
pub mod files;
pub mod messages;
pub mod quiz_responses;
pub mod quizzes;
pub mod subjects;
pub mod submissions;
pub mod teachings;
pub mod users;

use chrono::{DateTime, Utc};

pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}
