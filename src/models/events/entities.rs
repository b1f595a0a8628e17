use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Entrée du calendrier ; sans classe, l'événement est visible de tous
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct Event {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: Option<chrono::DateTime<chrono::Utc>>,
    pub location: Option<String>,
    pub class_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub author_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: Option<chrono::DateTime<chrono::Utc>>,
    pub location: Option<String>,
    pub class_id: Option<i64>,
}

/// Filtre de lecture : `class_ids == None` voit tout
#[derive(Debug, Clone, Default)]
pub struct EventRange {
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
    pub class_ids: Option<Vec<i64>>,
    pub author_id: Option<i64>,
}

pub fn valid_span(
    start_at: chrono::DateTime<chrono::Utc>,
    end_at: Option<chrono::DateTime<chrono::Utc>>,
) -> bool {
    end_at.is_none_or(|end| end >= start_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_valid_span() {
        let now = Utc::now();
        assert!(valid_span(now, None));
        assert!(valid_span(now, Some(now)));
        assert!(!valid_span(now, Some(now - Duration::minutes(1))));
    }
}
