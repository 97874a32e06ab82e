//! Core data model types for quizsmith.
//!
//! These are the types the rest of the system passes around: parsed and
//! stored questions, quizzes, submissions, scorecards and attempts.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The correct-answer declaration of a question.
///
/// Distinguishes a question whose answer line never appeared from one whose
/// answer line appeared but listed no recognizable labels. Serialized as
/// `null`, `[]` and `["A", "C"]` respectively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Vec<String>>", into = "Option<Vec<String>>")]
pub enum AnswerKey {
    /// No answer-declaration line was seen.
    #[default]
    Unseen,
    /// An answer-declaration line was seen but no label list matched.
    NoMatch,
    /// Labels (`"A"`, `"B"`, ...) in declaration order. Never empty.
    Labels(Vec<String>),
}

impl AnswerKey {
    /// Declared labels, empty for `Unseen` and `NoMatch`.
    pub fn labels(&self) -> &[String] {
        match self {
            AnswerKey::Labels(labels) => labels,
            AnswerKey::Unseen | AnswerKey::NoMatch => &[],
        }
    }

    pub fn is_unseen(&self) -> bool {
        matches!(self, AnswerKey::Unseen)
    }
}

impl From<Option<Vec<String>>> for AnswerKey {
    fn from(value: Option<Vec<String>>) -> Self {
        match value {
            None => AnswerKey::Unseen,
            Some(labels) if labels.is_empty() => AnswerKey::NoMatch,
            Some(labels) => AnswerKey::Labels(labels),
        }
    }
}

impl From<AnswerKey> for Option<Vec<String>> {
    fn from(value: AnswerKey) -> Self {
        match value {
            AnswerKey::Unseen => None,
            AnswerKey::NoMatch => Some(Vec::new()),
            AnswerKey::Labels(labels) => Some(labels),
        }
    }
}

/// A question extracted from a model completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuestion {
    /// The question prompt.
    pub text: String,
    /// Options in encounter order. Position N carries label `'A' + N`.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answers: AnswerKey,
}

/// A persisted question belonging to a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuestion {
    pub id: String,
    pub quiz_id: String,
    /// 1-based position in parser emission order.
    pub order: u32,
    #[serde(flatten)]
    pub question: ParsedQuestion,
}

/// Quiz difficulty passed through to the generation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Where a quiz's questions came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuizSource {
    Subject { subject: String },
    Document { file_name: String },
    /// A completion imported from outside the generation flow.
    Imported,
}

/// A generated quiz (questions are stored separately).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    /// User who generated the quiz.
    pub owner_id: String,
    pub title: String,
    pub source: QuizSource,
    pub difficulty: Difficulty,
    /// Number of questions requested, which may differ from the number parsed.
    pub num_questions: u32,
    pub created_at: DateTime<Utc>,
}

/// Question id → selected answer texts.
pub type SubmissionAnswers = HashMap<String, Vec<String>>;

/// A user's submission for one quiz.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub answers: SubmissionAnswers,
    /// When the user started the quiz, used if `time_taken_seconds` is absent.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_taken_seconds: Option<f64>,
}

/// Scoring outcome for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub question_id: String,
    pub is_correct: bool,
    /// Answer texts the user submitted, as given.
    pub user_answer: Vec<String>,
    /// Correct answer texts, resolved from labels.
    pub correct_answers: Vec<String>,
}

/// Per-question results together with their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub results: Vec<ScoredResult>,
    pub correct_count: usize,
    pub total_count: usize,
    /// `correct_count / total_count * 100`, or 0 when there are no questions.
    pub percentage: f64,
}

/// One user's completed, scored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub scorecard: Scorecard,
    pub completed_at: DateTime<Utc>,
    pub time_taken_seconds: f64,
}

/// A question as shown when reviewing an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewedQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answers: AnswerKey,
    pub user_selected_answers: Vec<String>,
    pub is_correct: bool,
}

/// An attempt joined with its quiz for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptReview {
    pub attempt_id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub quiz_difficulty: Difficulty,
    pub score: f64,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub completed_at: DateTime<Utc>,
    pub time_taken_seconds: f64,
    pub questions: Vec<ReviewedQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" medium ".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("impossible".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn answer_key_serializes_as_nullable_list() {
        assert_eq!(serde_json::to_string(&AnswerKey::Unseen).unwrap(), "null");
        assert_eq!(serde_json::to_string(&AnswerKey::NoMatch).unwrap(), "[]");
        assert_eq!(
            serde_json::to_string(&AnswerKey::Labels(vec!["A".into(), "C".into()])).unwrap(),
            r#"["A","C"]"#
        );

        let unseen: AnswerKey = serde_json::from_str("null").unwrap();
        let no_match: AnswerKey = serde_json::from_str("[]").unwrap();
        assert_eq!(unseen, AnswerKey::Unseen);
        assert_eq!(no_match, AnswerKey::NoMatch);
    }

    #[test]
    fn stored_question_flattens_parsed_fields() {
        let question = StoredQuestion {
            id: "q1".into(),
            quiz_id: "quiz".into(),
            order: 1,
            question: ParsedQuestion {
                text: "Which are primary colors?".into(),
                options: vec!["Red".into(), "Blue".into()],
                correct_answers: AnswerKey::NoMatch,
            },
        };
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["text"], "Which are primary colors?");
        assert_eq!(value["correct_answers"], serde_json::json!([]));

        let back: StoredQuestion = serde_json::from_value(value).unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn missing_answer_key_field_is_unseen() {
        let json = r#"{"id":"q1","quiz_id":"z","order":2,"text":"Q?","options":["a"]}"#;
        let question: StoredQuestion = serde_json::from_str(json).unwrap();
        assert!(question.question.correct_answers.is_unseen());
        assert!(question.question.correct_answers.labels().is_empty());
    }

    #[test]
    fn submission_defaults() {
        let submission: Submission = serde_json::from_str("{}").unwrap();
        assert!(submission.answers.is_empty());
        assert!(submission.start_time.is_none());
        assert!(submission.time_taken_seconds.is_none());
    }
}
