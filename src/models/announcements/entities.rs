use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Public visé par un avis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub enum Audience {
    Tous,
    Profs,
    Eleves,
    Classe,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Tous => "tous",
            Audience::Profs => "profs",
            Audience::Eleves => "eleves",
            Audience::Classe => "classe",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tous" => Ok(Audience::Tous),
            "profs" => Ok(Audience::Profs),
            "eleves" => Ok(Audience::Eleves),
            "classe" => Ok(Audience::Classe),
            _ => Err(format!("Public inconnu : {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct Announcement {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub audience: Audience,
    pub class_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub audience: Audience,
    pub class_id: Option<i64>,
}

/// Ce qu'un lecteur a le droit de voir
#[derive(Debug, Clone, Default)]
pub struct AnnouncementVisibility {
    /// `None` : aucun filtre (administration)
    pub audiences: Option<Vec<Audience>>,
    pub class_ids: Vec<i64>,
    pub author_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_parse() {
        assert_eq!("classe".parse::<Audience>(), Ok(Audience::Classe));
        assert!("parents".parse::<Audience>().is_err());
        assert_eq!(
            serde_json::to_string(&Audience::Eleves).expect("json"),
            "\"eleves\""
        );
    }
}
