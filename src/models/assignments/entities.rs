use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::submissions::entities::Submission;

/// Forme de rendu attendue
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum SubmissionType {
    #[default]
    Texte,
    Fichier,
    TexteEtFichier,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::Texte => "texte",
            SubmissionType::Fichier => "fichier",
            SubmissionType::TexteEtFichier => "texte_et_fichier",
        }
    }

    /// Vérifie qu'un rendu contient ce que le devoir demande
    pub fn check(&self, content: Option<&str>, file_token: Option<&str>) -> Result<(), &'static str> {
        let has_text = content.is_some_and(|c| !c.trim().is_empty());
        let has_file = file_token.is_some_and(|t| !t.is_empty());
        match self {
            SubmissionType::Texte if !has_text => Err("Ce devoir attend une réponse écrite"),
            SubmissionType::Fichier if !has_file => Err("Ce devoir attend un fichier"),
            SubmissionType::TexteEtFichier if !(has_text && has_file) => {
                Err("Ce devoir attend une réponse écrite et un fichier")
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "texte" => Ok(SubmissionType::Texte),
            "fichier" => Ok(SubmissionType::Fichier),
            "texte_et_fichier" => Ok(SubmissionType::TexteEtFichier),
            _ => Err(format!("Invalid submission type: {s}")),
        }
    }
}

/// Devoir
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub submission_type: SubmissionType,
    pub max_grade: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    pub fn is_past_due(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now > self.due_date
    }
}

/// Situation d'un élève vis-à-vis d'un devoir, calculée à la lecture
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum AssignmentStatus {
    ARendre,
    Rendu,
    Corrige,
    EnRetard,
}

impl AssignmentStatus {
    pub fn derive(
        now: chrono::DateTime<chrono::Utc>,
        assignment: &Assignment,
        submission: Option<&Submission>,
    ) -> Self {
        match submission {
            Some(s) if s.is_graded => AssignmentStatus::Corrige,
            Some(_) => AssignmentStatus::Rendu,
            None if assignment.is_past_due(now) => AssignmentStatus::EnRetard,
            None => AssignmentStatus::ARendre,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn assignment(due_in: Duration) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            teacher_id: 2,
            class_id: 3,
            subject_id: 4,
            title: "Dissertation".into(),
            description: None,
            due_date: now + due_in,
            submission_type: SubmissionType::Texte,
            max_grade: 20.0,
            created_at: now,
            updated_at: now,
        }
    }

    fn submission(is_graded: bool) -> Submission {
        let now = Utc::now();
        Submission {
            id: 9,
            assignment_id: 1,
            student_id: 5,
            content: Some("Ma copie".into()),
            file_token: None,
            grade: is_graded.then_some(14.0),
            comment: None,
            is_graded,
            graded_by: None,
            graded_at: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_derivation() {
        let now = Utc::now();
        let open = assignment(Duration::days(2));
        let closed = assignment(Duration::days(-1));

        assert_eq!(AssignmentStatus::derive(now, &open, None), AssignmentStatus::ARendre);
        assert_eq!(AssignmentStatus::derive(now, &closed, None), AssignmentStatus::EnRetard);
        assert_eq!(
            AssignmentStatus::derive(now, &closed, Some(&submission(false))),
            AssignmentStatus::Rendu
        );
        assert_eq!(
            AssignmentStatus::derive(now, &open, Some(&submission(true))),
            AssignmentStatus::Corrige
        );
    }

    #[test]
    fn test_submission_type_check() {
        assert!(SubmissionType::Texte.check(Some("réponse"), None).is_ok());
        assert!(SubmissionType::Texte.check(Some("   "), None).is_err());
        assert!(SubmissionType::Fichier.check(None, Some("abc")).is_ok());
        assert!(SubmissionType::TexteEtFichier.check(Some("x"), None).is_err());
        assert_eq!(
            serde_json::to_string(&SubmissionType::TexteEtFichier).expect("json"),
            "\"texte_et_fichier\""
        );
    }
}
