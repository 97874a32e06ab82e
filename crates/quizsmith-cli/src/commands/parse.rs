//! The `quizsmith parse` command.

use std::path::Path;

use anyhow::Result;

use quizsmith_core::parser::{parse_quiz_response, validate_questions};

use super::read_text;

pub fn execute(raw: &Path) -> Result<()> {
    let text = read_text(raw)?;
    let questions = parse_quiz_response(&text);

    println!("{}", serde_json::to_string_pretty(&questions)?);

    let warnings = validate_questions(&questions);
    for warning in &warnings {
        eprintln!("  question {}: {}", warning.question, warning.message);
    }
    eprintln!(
        "{} question(s), {} warning(s)",
        questions.len(),
        warnings.len()
    );

    Ok(())
}
