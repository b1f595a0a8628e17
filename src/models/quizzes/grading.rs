//! Validation des quiz à la saisie et notation des réponses.

use chrono::{DateTime, Utc};
use std::fmt;

use super::entities::{GradingMode, QuizAnswer, QuizQuestion};

/// Tolérance sur la somme des points (flottants saisis au dixième)
pub const POINT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub enum QuizValidationError {
    NoQuestions,
    InvalidScale,
    EmptyPrompt { index: usize },
    NonPositivePoints { index: usize },
    TooFewOptions { index: usize },
    NoCorrectOption { index: usize },
    CorrectOptionOutOfRange { index: usize },
    OpenQuestionInAutoMode { index: usize },
    PointBudgetMismatch { total: f64, scale: f64 },
    InvalidDates,
}

impl fmt::Display for QuizValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // les numéros de question affichés commencent à 1
        match self {
            Self::NoQuestions => write!(f, "Le quiz doit contenir au moins une question"),
            Self::InvalidScale => write!(f, "Le barème doit être strictement positif"),
            Self::EmptyPrompt { index } => {
                write!(f, "Question {} : l'énoncé est vide", index + 1)
            }
            Self::NonPositivePoints { index } => {
                write!(f, "Question {} : les points doivent être positifs", index + 1)
            }
            Self::TooFewOptions { index } => {
                write!(f, "Question {} : au moins deux choix sont nécessaires", index + 1)
            }
            Self::NoCorrectOption { index } => {
                write!(f, "Question {} : indiquez au moins une bonne réponse", index + 1)
            }
            Self::CorrectOptionOutOfRange { index } => {
                write!(f, "Question {} : bonne réponse hors des choix proposés", index + 1)
            }
            Self::OpenQuestionInAutoMode { index } => write!(
                f,
                "Question {} : une question ouverte impose la correction manuelle",
                index + 1
            ),
            Self::PointBudgetMismatch { total, scale } => write!(
                f,
                "Le total des points ({total}) doit être égal au barème ({scale})"
            ),
            Self::InvalidDates => {
                write!(f, "La date d'ouverture doit précéder la date limite")
            }
        }
    }
}

pub fn total_points(questions: &[QuizQuestion]) -> f64 {
    questions.iter().map(QuizQuestion::points).sum()
}

/// Contrôles effectués avant tout enregistrement d'un quiz
pub fn validate_quiz(
    questions: &[QuizQuestion],
    scale: f64,
    mode: GradingMode,
    starts_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
) -> Result<(), QuizValidationError> {
    if starts_at >= deadline {
        return Err(QuizValidationError::InvalidDates);
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(QuizValidationError::InvalidScale);
    }
    if questions.is_empty() {
        return Err(QuizValidationError::NoQuestions);
    }

    for (index, question) in questions.iter().enumerate() {
        if question.prompt().trim().is_empty() {
            return Err(QuizValidationError::EmptyPrompt { index });
        }
        let points = question.points();
        if !points.is_finite() || points <= 0.0 {
            return Err(QuizValidationError::NonPositivePoints { index });
        }
        match question {
            QuizQuestion::Qcm {
                options, correct, ..
            } => {
                if options.len() < 2 || options.iter().any(|o| o.trim().is_empty()) {
                    return Err(QuizValidationError::TooFewOptions { index });
                }
                if correct.is_empty() {
                    return Err(QuizValidationError::NoCorrectOption { index });
                }
                if correct.iter().any(|&c| c >= options.len()) {
                    return Err(QuizValidationError::CorrectOptionOutOfRange { index });
                }
            }
            _ if mode == GradingMode::Auto && !question.is_auto_gradable() => {
                return Err(QuizValidationError::OpenQuestionInAutoMode { index });
            }
            _ => {}
        }
    }

    let total = total_points(questions);
    if (total - scale).abs() > POINT_EPSILON {
        return Err(QuizValidationError::PointBudgetMismatch { total, scale });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    CountMismatch { expected: usize, got: usize },
    KindMismatch { index: usize },
    OptionOutOfRange { index: usize },
}

impl fmt::Display for AnswerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountMismatch { expected, got } => write!(
                f,
                "Une réponse par question est attendue ({expected} attendues, {got} reçues)"
            ),
            Self::KindMismatch { index } => {
                write!(f, "Question {} : type de réponse inattendu", index + 1)
            }
            Self::OptionOutOfRange { index } => {
                write!(f, "Question {} : choix inexistant", index + 1)
            }
        }
    }
}

fn same_selection(selected: &[usize], correct: &[usize]) -> bool {
    let mut a = selected.to_vec();
    let mut b = correct.to_vec();
    a.sort_unstable();
    a.dedup();
    b.sort_unstable();
    b.dedup();
    a == b
}

/// Vérifie les réponses et calcule la partie corrigée automatiquement.
///
/// Un QCM ne rapporte ses points que si la sélection est exactement
/// l'ensemble des bonnes options. Les questions ouvertes rapportent 0 ici.
pub fn score_answers(
    questions: &[QuizQuestion],
    answers: &[QuizAnswer],
) -> Result<f64, AnswerError> {
    if questions.len() != answers.len() {
        return Err(AnswerError::CountMismatch {
            expected: questions.len(),
            got: answers.len(),
        });
    }

    let mut score = 0.0;
    for (index, (question, answer)) in questions.iter().zip(answers).enumerate() {
        match (question, answer) {
            (
                QuizQuestion::Qcm {
                    options,
                    correct,
                    points,
                    ..
                },
                QuizAnswer::Qcm { selected },
            ) => {
                if selected.iter().any(|&s| s >= options.len()) {
                    return Err(AnswerError::OptionOutOfRange { index });
                }
                if same_selection(selected, correct) {
                    score += points;
                }
            }
            (QuizQuestion::VraiFaux { correct, points, .. }, QuizAnswer::VraiFaux { value }) => {
                if value == correct {
                    score += points;
                }
            }
            (QuizQuestion::TexteLibre { .. }, QuizAnswer::TexteLibre { .. }) => {}
            _ => return Err(AnswerError::KindMismatch { index }),
        }
    }
    Ok(score)
}

/// `0 <= grade <= max`
pub fn grade_in_range(grade: f64, max: f64) -> bool {
    grade.is_finite() && grade >= 0.0 && grade <= max + POINT_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn qcm(points: f64, correct: Vec<usize>) -> QuizQuestion {
        QuizQuestion::Qcm {
            prompt: "Choisir".into(),
            points,
            options: vec!["a".into(), "b".into(), "c".into()],
            correct,
        }
    }

    fn vf(points: f64, correct: bool) -> QuizQuestion {
        QuizQuestion::VraiFaux {
            prompt: "Vrai ?".into(),
            points,
            correct,
        }
    }

    fn open(points: f64) -> QuizQuestion {
        QuizQuestion::TexteLibre {
            prompt: "Expliquer".into(),
            points,
        }
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now, now + Duration::days(1))
    }

    #[test]
    fn test_point_budget_must_match_scale() {
        let (start, end) = window();
        let questions = vec![qcm(8.0, vec![0]), vf(12.0, true)];
        assert!(validate_quiz(&questions, 20.0, GradingMode::Auto, start, end).is_ok());

        let err = validate_quiz(&questions, 10.0, GradingMode::Auto, start, end).unwrap_err();
        assert_eq!(
            err,
            QuizValidationError::PointBudgetMismatch {
                total: 20.0,
                scale: 10.0
            }
        );
    }

    #[test]
    fn test_point_budget_tolerates_float_noise() {
        let (start, end) = window();
        let questions = vec![vf(0.1, true), vf(0.2, false)];
        assert!(validate_quiz(&questions, 0.3, GradingMode::Auto, start, end).is_ok());
    }

    #[test]
    fn test_auto_mode_rejects_open_question() {
        let (start, end) = window();
        let questions = vec![vf(10.0, true), open(10.0)];
        assert_eq!(
            validate_quiz(&questions, 20.0, GradingMode::Auto, start, end),
            Err(QuizValidationError::OpenQuestionInAutoMode { index: 1 })
        );
        assert!(validate_quiz(&questions, 20.0, GradingMode::Manuel, start, end).is_ok());
    }

    #[test]
    fn test_structural_checks() {
        let (start, end) = window();
        assert_eq!(
            validate_quiz(&[], 20.0, GradingMode::Auto, start, end),
            Err(QuizValidationError::NoQuestions)
        );
        assert_eq!(
            validate_quiz(&[qcm(20.0, vec![])], 20.0, GradingMode::Auto, start, end),
            Err(QuizValidationError::NoCorrectOption { index: 0 })
        );
        assert_eq!(
            validate_quiz(&[qcm(20.0, vec![5])], 20.0, GradingMode::Auto, start, end),
            Err(QuizValidationError::CorrectOptionOutOfRange { index: 0 })
        );
        assert_eq!(
            validate_quiz(&[vf(20.0, true)], 20.0, GradingMode::Auto, end, start),
            Err(QuizValidationError::InvalidDates)
        );
        assert_eq!(
            validate_quiz(&[vf(0.0, true)], 20.0, GradingMode::Auto, start, end),
            Err(QuizValidationError::NonPositivePoints { index: 0 })
        );
    }

    #[test]
    fn test_scoring() {
        let questions = vec![qcm(4.0, vec![0, 2]), vf(6.0, false), open(10.0)];
        let all_right = vec![
            QuizAnswer::Qcm {
                selected: vec![2, 0],
            },
            QuizAnswer::VraiFaux { value: false },
            QuizAnswer::TexteLibre {
                text: "Parce que…".into(),
            },
        ];
        assert_eq!(score_answers(&questions, &all_right), Ok(10.0));

        // sélection partielle : aucun point
        let partial = vec![
            QuizAnswer::Qcm { selected: vec![0] },
            QuizAnswer::VraiFaux { value: true },
            QuizAnswer::TexteLibre { text: String::new() },
        ];
        assert_eq!(score_answers(&questions, &partial), Ok(0.0));
    }

    #[test]
    fn test_answer_shape_errors() {
        let questions = vec![qcm(4.0, vec![0]), vf(6.0, true)];
        assert_eq!(
            score_answers(&questions, &[QuizAnswer::VraiFaux { value: true }]),
            Err(AnswerError::CountMismatch {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            score_answers(
                &questions,
                &[
                    QuizAnswer::VraiFaux { value: true },
                    QuizAnswer::VraiFaux { value: true }
                ]
            ),
            Err(AnswerError::KindMismatch { index: 0 })
        );
        assert_eq!(
            score_answers(
                &questions,
                &[
                    QuizAnswer::Qcm { selected: vec![7] },
                    QuizAnswer::VraiFaux { value: true }
                ]
            ),
            Err(AnswerError::OptionOutOfRange { index: 0 })
        );
    }

    #[test]
    fn test_grade_range() {
        assert!(grade_in_range(0.0, 20.0));
        assert!(grade_in_range(20.0, 20.0));
        assert!(!grade_in_range(20.5, 20.0));
        assert!(!grade_in_range(-1.0, 20.0));
        assert!(!grade_in_range(f64::NAN, 20.0));
    }
}
