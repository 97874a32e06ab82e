//! Submission scoring.
//!
//! Resolves each stored question's answer labels to option texts by
//! position and compares them, as unordered sets, with the texts the user
//! selected.

use std::collections::HashSet;

use crate::error::ScoreError;
use crate::model::{ScoredResult, Scorecard, StoredQuestion, SubmissionAnswers};

/// Label of the option at `index` (`0 → 'A'`). Labels stop at `'Z'`.
pub fn option_label(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
}

/// Position of the option a label refers to, if the label is well formed.
fn label_index(label: &str) -> Option<usize> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'A'..='Z'), None) => Some(c as usize - 'A' as usize),
        _ => None,
    }
}

/// Resolve a question's correct-answer labels to option texts.
///
/// Labels map to options by position only. A label without a matching
/// option is an `InconsistentQuestionData` fault. A question whose answer
/// line was never seen resolves to no correct answers.
pub fn resolve_correct_answers(question: &StoredQuestion) -> Result<Vec<String>, ScoreError> {
    let options = &question.question.options;

    if question.question.correct_answers.is_unseen() {
        tracing::warn!(
            question_id = %question.id,
            "question has no answer key, scoring against an empty answer set"
        );
    }

    question
        .question
        .correct_answers
        .labels()
        .iter()
        .map(|label| {
            label_index(label)
                .and_then(|idx| options.get(idx))
                .cloned()
                .ok_or_else(|| ScoreError::InconsistentQuestionData {
                    question_id: question.id.clone(),
                    label: label.clone(),
                    option_count: options.len(),
                })
        })
        .collect()
}

/// Score a submission against a quiz's questions, in the order given.
///
/// Missing answers count as an empty selection. Either every question is
/// scored or the first inconsistent question's fault is returned.
pub fn score_submission(
    questions: &[StoredQuestion],
    answers: &SubmissionAnswers,
) -> Result<Scorecard, ScoreError> {
    let mut results = Vec::with_capacity(questions.len());

    for question in questions {
        let correct_answers = resolve_correct_answers(question)?;
        let user_answer = answers.get(&question.id).cloned().unwrap_or_default();

        let selected: HashSet<&str> = user_answer.iter().map(String::as_str).collect();
        let expected: HashSet<&str> = correct_answers.iter().map(String::as_str).collect();

        results.push(ScoredResult {
            question_id: question.id.clone(),
            is_correct: selected == expected,
            user_answer,
            correct_answers,
        });
    }

    let correct_count = results.iter().filter(|r| r.is_correct).count();
    let total_count = results.len();
    let percentage = if total_count > 0 {
        correct_count as f64 / total_count as f64 * 100.0
    } else {
        0.0
    };

    Ok(Scorecard {
        results,
        correct_count,
        total_count,
        percentage,
    })
}
