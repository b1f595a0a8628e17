use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub enum GradingMode {
    /// Note calculée à la soumission
    #[default]
    Auto,
    /// Note saisie par le professeur
    Manuel,
}

impl GradingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradingMode::Auto => "auto",
            GradingMode::Manuel => "manuel",
        }
    }
}

impl std::fmt::Display for GradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GradingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(GradingMode::Auto),
            "manuel" => Ok(GradingMode::Manuel),
            _ => Err(format!("Invalid grading mode: {s}")),
        }
    }
}

/// Question telle que stockée, avec la bonne réponse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub enum QuizQuestion {
    /// Choix multiple ; `correct` contient les indices des bonnes options
    Qcm {
        prompt: String,
        points: f64,
        options: Vec<String>,
        correct: Vec<usize>,
    },
    VraiFaux {
        prompt: String,
        points: f64,
        correct: bool,
    },
    /// Réponse ouverte, corrigée à la main
    TexteLibre { prompt: String, points: f64 },
}

impl QuizQuestion {
    pub fn prompt(&self) -> &str {
        match self {
            QuizQuestion::Qcm { prompt, .. }
            | QuizQuestion::VraiFaux { prompt, .. }
            | QuizQuestion::TexteLibre { prompt, .. } => prompt,
        }
    }

    pub fn points(&self) -> f64 {
        match self {
            QuizQuestion::Qcm { points, .. }
            | QuizQuestion::VraiFaux { points, .. }
            | QuizQuestion::TexteLibre { points, .. } => *points,
        }
    }

    pub fn is_auto_gradable(&self) -> bool {
        !matches!(self, QuizQuestion::TexteLibre { .. })
    }

    /// Version sans la bonne réponse, pour les élèves
    pub fn redacted(&self) -> PublicQuizQuestion {
        match self {
            QuizQuestion::Qcm {
                prompt,
                points,
                options,
                correct,
            } => PublicQuizQuestion::Qcm {
                prompt: prompt.clone(),
                points: *points,
                options: options.clone(),
                multiple: correct.len() > 1,
            },
            QuizQuestion::VraiFaux { prompt, points, .. } => PublicQuizQuestion::VraiFaux {
                prompt: prompt.clone(),
                points: *points,
            },
            QuizQuestion::TexteLibre { prompt, points } => PublicQuizQuestion::TexteLibre {
                prompt: prompt.clone(),
                points: *points,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub enum PublicQuizQuestion {
    Qcm {
        prompt: String,
        points: f64,
        options: Vec<String>,
        /// Plusieurs options attendues
        multiple: bool,
    },
    VraiFaux {
        prompt: String,
        points: f64,
    },
    TexteLibre {
        prompt: String,
        points: f64,
    },
}

/// Réponse d'un élève à une question, dans l'ordre des questions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub enum QuizAnswer {
    Qcm { selected: Vec<usize> },
    VraiFaux { value: bool },
    TexteLibre { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct Quiz {
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "date_debut")]
    pub starts_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "date_limite")]
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub grading_mode: GradingMode,
    /// Barème (note sur …)
    pub scale: f64,
    pub questions: Vec<QuizQuestion>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizResponse {
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    pub answers: Vec<QuizAnswer>,
    /// Points obtenus sur les questions corrigées automatiquement
    pub auto_score: f64,
    pub final_grade: Option<f64>,
    pub is_graded: bool,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// Quiz à enregistrer, déjà validé
#[derive(Debug, Clone)]
pub struct QuizDraft {
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub grading_mode: GradingMode,
    pub scale: f64,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone)]
pub struct NewQuizResponse {
    pub quiz_id: i64,
    pub student_id: i64,
    pub answers: Vec<QuizAnswer>,
    pub auto_score: f64,
    /// Renseigné en mode auto : la réponse est enregistrée déjà corrigée
    pub final_grade: Option<f64>,
}
