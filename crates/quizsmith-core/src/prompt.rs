//! Generation prompt builder.
//!
//! The prompt carries a worked example in the exact markup that
//! [`crate::parser::parse_quiz_response`] understands; changing one without
//! the other breaks parsing.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{Difficulty, QuizSource};

/// Default number of questions per quiz.
pub const DEFAULT_NUM_QUESTIONS: u32 = 5;

const FORMAT_INSTRUCTIONS: &str = "For each question, provide the question, four options (A, B, C, D), and then list ALL correct answer labels (e.g., A, C) on a new line starting with **Correct Answers:**. Use Markdown format.

Example:
1. Which of the following are primary colors?
A. Red
B. Blue
C. Green
D. Yellow
**Correct Answers:** A, B

2. Which of these animals lay eggs?
A. Chicken
B. Cow
C. Snake
D. Dog
**Correct Answers:** A, C";

/// What a quiz is generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceMaterial {
    Subject(String),
    Document { file_name: String, text: String },
}

/// A request to generate a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRequest {
    pub source: SourceMaterial,
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn default_num_questions() -> u32 {
    DEFAULT_NUM_QUESTIONS
}

impl QuizRequest {
    pub fn subject(subject: impl Into<String>) -> Self {
        Self {
            source: SourceMaterial::Subject(subject.into()),
            num_questions: DEFAULT_NUM_QUESTIONS,
            difficulty: Difficulty::default(),
        }
    }

    pub fn document(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: SourceMaterial::Document {
                file_name: file_name.into(),
                text: text.into(),
            },
            num_questions: DEFAULT_NUM_QUESTIONS,
            difficulty: Difficulty::default(),
        }
    }

    pub fn with_num_questions(mut self, num_questions: u32) -> Self {
        self.num_questions = num_questions;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Title shown in history and review.
    pub fn title(&self) -> String {
        match &self.source {
            SourceMaterial::Subject(subject) => format!("Quiz on {}", subject.trim()),
            SourceMaterial::Document { file_name, .. } => format!("Quiz from {file_name}"),
        }
    }

    /// Source recorded on the stored quiz (document text is not kept).
    pub fn quiz_source(&self) -> QuizSource {
        match &self.source {
            SourceMaterial::Subject(subject) => QuizSource::Subject {
                subject: subject.trim().to_string(),
            },
            SourceMaterial::Document { file_name, .. } => QuizSource::Document {
                file_name: file_name.clone(),
            },
        }
    }
}

/// Build the generation prompt for a request.
pub fn build_prompt(request: &QuizRequest) -> Result<String, QuizError> {
    if request.num_questions == 0 {
        return Err(QuizError::InvalidRequest(
            "num_questions must be at least 1".into(),
        ));
    }

    let material = match &request.source {
        SourceMaterial::Subject(subject) => {
            let subject = subject.trim();
            if subject.is_empty() {
                return Err(QuizError::EmptySource("subject is empty".into()));
            }
            format!("about the subject: {subject}")
        }
        SourceMaterial::Document { file_name, text } => {
            if text.trim().is_empty() {
                return Err(QuizError::EmptySource(format!(
                    "no text content in {file_name}"
                )));
            }
            format!("based on the following text: {text}")
        }
    };

    Ok(format!(
        "Generate {} multiple-select quiz questions (MSQ) with options and correct answers {material}\n\nDifficulty: {}.\n\n{FORMAT_INSTRUCTIONS}",
        request.num_questions, request.difficulty,
    ))
}
