//! Quiz completion parser.
//!
//! Turns the line-oriented markup a model produces for the quiz prompt into
//! structured questions:
//!
//! ```text
//! 1. Which of the following are primary colors?
//! A. Red
//! B. Blue
//! C. Green
//! D. Yellow
//! **Correct Answers:** A, B
//! ```
//!
//! Parsing never fails. Malformed input degrades to partial or empty output.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{AnswerKey, ParsedQuestion};
use crate::scoring::option_label;

const OPTION_PREFIXES: [&str; 4] = ["A.", "B.", "C.", "D."];
const ANSWER_PREFIX: &str = "**Correct Answers:";
const TEXT_SEPARATOR: &str = ". ";

/// One or more labels A-D separated by `", "`.
static ANSWER_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-D](?:, [A-D])*\b").expect("answer pattern is valid"));

/// Classification of a single trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    /// Question text after the first `". "`.
    QuestionStart(&'a str),
    /// Option text after the first `". "`, if the line has one.
    Option(Option<&'a str>),
    /// The whole answer-declaration line.
    AnswerDeclaration(&'a str),
    Blank,
    Other,
}

fn classify(line: &str) -> Line<'_> {
    if line.is_empty() {
        return Line::Blank;
    }

    let after_separator = line
        .split_once(TEXT_SEPARATOR)
        .map(|(_, rest)| rest);

    if line.starts_with(|c: char| c.is_ascii_digit()) {
        if let Some(text) = after_separator {
            return Line::QuestionStart(text);
        }
    }

    if OPTION_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
        return Line::Option(after_separator);
    }

    if line.starts_with(ANSWER_PREFIX) {
        return Line::AnswerDeclaration(line);
    }

    Line::Other
}

/// Extract the answer key from an answer-declaration line.
fn parse_answer_key(line: &str) -> AnswerKey {
    match ANSWER_LIST.find(line) {
        Some(found) => AnswerKey::Labels(
            found
                .as_str()
                .split(',')
                .map(|label| label.trim().to_string())
                .collect(),
        ),
        None => AnswerKey::NoMatch,
    }
}

/// Parse a model completion into questions, in source order.
///
/// - A question starts on a line whose first character is an ASCII digit and
///   which contains `". "`; starting one emits the previous question.
/// - Lines starting with `A.`, `B.`, `C.` or `D.` append an option. The label
///   an option receives is its position, not its literal prefix.
/// - A line starting with `**Correct Answers:` sets the answer key.
/// - Options and answer lines before the first question are discarded, as
///   are all other lines.
pub fn parse_quiz_response(raw: &str) -> Vec<ParsedQuestion> {
    let mut questions = Vec::new();
    let mut current: Option<ParsedQuestion> = None;

    for (line_no, line) in raw.lines().enumerate() {
        match classify(line.trim()) {
            Line::QuestionStart(text) => {
                if let Some(done) = current.take() {
                    questions.push(done);
                }
                current = Some(ParsedQuestion {
                    text: text.to_string(),
                    options: Vec::new(),
                    correct_answers: AnswerKey::Unseen,
                });
            }
            Line::Option(text) => match (current.as_mut(), text) {
                (Some(question), Some(text)) => question.options.push(text.to_string()),
                (None, _) => {
                    tracing::debug!(line = line_no + 1, "option before any question, discarded");
                }
                (Some(_), None) => {
                    tracing::debug!(line = line_no + 1, "option line without text, skipped");
                }
            },
            Line::AnswerDeclaration(text) => match current.as_mut() {
                Some(question) => question.correct_answers = parse_answer_key(text),
                None => {
                    tracing::debug!(line = line_no + 1, "answer line before any question, discarded");
                }
            },
            Line::Blank | Line::Other => {}
        }
    }

    if let Some(done) = current {
        questions.push(done);
    }

    questions
}

/// A warning from question validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// 1-based question position.
    pub question: usize,
    /// Warning message.
    pub message: String,
}

/// Check parsed questions for issues that will make them review or score
/// poorly. Never rejects anything.
pub fn validate_questions(questions: &[ParsedQuestion]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (idx, question) in questions.iter().enumerate() {
        let position = idx + 1;
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question: position,
                message,
            })
        };

        if question.options.len() < 4 {
            warn(format!(
                "only {} option(s), expected 4",
                question.options.len()
            ));
        }

        match &question.correct_answers {
            AnswerKey::Unseen => warn("no correct answers line".into()),
            AnswerKey::NoMatch => warn("correct answers line lists no valid labels".into()),
            AnswerKey::Labels(labels) => {
                let available: Vec<String> = (0..question.options.len())
                    .filter_map(option_label)
                    .map(String::from)
                    .collect();
                for label in labels {
                    if !available.contains(label) {
                        warn(format!("correct answer '{label}' has no matching option"));
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        for option in &question.options {
            if !seen.insert(option.as_str()) {
                warn(format!(
                    "duplicate option text '{option}' cannot be told apart when scoring"
                ));
            }
        }
    }

    warnings
}
