//! The `quizsmith submit` command.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

use quizsmith_core::model::{StoredQuestion, Submission, SubmissionAnswers};
use quizsmith_core::scoring::option_label;

use super::{read_text, Context};

/// Accepted answer file layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswersFile {
    /// `{"<question id or number>": ["<option text or label>", ...]}`
    Plain(HashMap<String, Vec<String>>),
    Full(Submission),
}

/// Map question numbers to ids and option labels to option texts.
///
/// Each question may be named by only one key, either its id or its number.
///
/// Values that are neither an option text nor a known label are kept as
/// given and simply score as wrong.
fn resolve_answers(
    questions: &[StoredQuestion],
    raw: HashMap<String, Vec<String>>,
) -> Result<SubmissionAnswers> {
    let mut raw: Vec<_> = raw.into_iter().collect();
    raw.sort_by(|a, b| a.0.cmp(&b.0));

    let mut answers = SubmissionAnswers::new();
    // Question id → the answers-file key that named it.
    let mut named_by: HashMap<String, String> = HashMap::new();
    for (key, selected) in raw {
        let question = questions
            .iter()
            .find(|q| q.id == key)
            .or_else(|| {
                let order = key.trim().parse::<u32>().ok()?;
                questions.iter().find(|q| q.order == order)
            })
            .with_context(|| format!("quiz has no question '{key}'"))?;
        if let Some(first) = named_by.get(&question.id) {
            anyhow::bail!(
                "question {} is answered twice, as '{first}' and as '{key}'",
                question.order
            );
        }
        named_by.insert(question.id.clone(), key.clone());

        let options = &question.question.options;
        let texts = selected
            .into_iter()
            .map(|value| {
                if options.contains(&value) {
                    return value;
                }
                options
                    .iter()
                    .enumerate()
                    .find(|(i, _)| option_label(*i).is_some_and(|l| value.trim() == l.to_string()))
                    .map(|(_, text)| text.clone())
                    .unwrap_or(value)
            })
            .collect();
        answers.insert(question.id.clone(), texts);
    }
    Ok(answers)
}

pub async fn execute(
    ctx: &Context,
    quiz_id: &str,
    answers_path: &Path,
    time_taken: Option<f64>,
) -> Result<()> {
    let content = read_text(answers_path)?;
    let parsed: AnswersFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers: {}", answers_path.display()))?;

    let service = ctx.offline_service()?;
    let details = service.quiz(quiz_id).await?;

    let mut submission = match parsed {
        AnswersFile::Plain(raw) => Submission {
            answers: raw,
            ..Default::default()
        },
        AnswersFile::Full(submission) => submission,
    };
    submission.answers = resolve_answers(&details.questions, submission.answers)?;
    if time_taken.is_some() {
        submission.time_taken_seconds = time_taken;
    }

    let attempt = service.submit(&ctx.user, quiz_id, &submission).await?;
    let scorecard = &attempt.scorecard;

    for (question, result) in details.questions.iter().zip(&scorecard.results) {
        let verdict = if result.is_correct { "correct" } else { "wrong" };
        println!("{}. {} [{verdict}]", question.order, question.question.text);
        if !result.is_correct {
            println!("   your answer: {}", result.user_answer.join(", "));
            println!("   correct:     {}", result.correct_answers.join(", "));
        }
    }

    println!();
    println!(
        "Score: {}/{} ({:.1}%)",
        scorecard.correct_count, scorecard.total_count, scorecard.percentage
    );
    println!("Attempt id: {}", attempt.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizsmith_core::model::{AnswerKey, ParsedQuestion};

    fn questions() -> Vec<StoredQuestion> {
        vec![
            StoredQuestion {
                id: "q-colors".into(),
                quiz_id: "quiz".into(),
                order: 1,
                question: ParsedQuestion {
                    text: "Primary colors?".into(),
                    options: vec!["Red".into(), "Blue".into(), "Green".into(), "A".into()],
                    correct_answers: AnswerKey::Labels(vec!["A".into(), "B".into()]),
                },
            },
            StoredQuestion {
                id: "q-eggs".into(),
                quiz_id: "quiz".into(),
                order: 2,
                question: ParsedQuestion {
                    text: "Lay eggs?".into(),
                    options: vec!["Chicken".into(), "Cow".into()],
                    correct_answers: AnswerKey::Labels(vec!["A".into()]),
                },
            },
        ]
    }

    #[test]
    fn numbers_and_labels_are_resolved() {
        let raw = HashMap::from([
            ("1".to_string(), vec!["Red".to_string(), "B".to_string()]),
            ("q-eggs".to_string(), vec!["a".to_string(), "Z".to_string()]),
        ]);
        let answers = resolve_answers(&questions(), raw).unwrap();
        assert_eq!(answers["q-colors"], vec!["Red", "Blue"]);
        // Lowercase and out-of-range labels are kept verbatim.
        assert_eq!(answers["q-eggs"], vec!["a", "Z"]);
    }

    #[test]
    fn option_text_wins_over_label() {
        let raw = HashMap::from([("1".to_string(), vec!["A".to_string()])]);
        let answers = resolve_answers(&questions(), raw).unwrap();
        assert_eq!(answers["q-colors"], vec!["A"]);
    }

    #[test]
    fn unknown_question_is_an_error() {
        let raw = HashMap::from([("7".to_string(), vec![])]);
        let err = resolve_answers(&questions(), raw).unwrap_err();
        assert!(err.to_string().contains("no question '7'"));
    }

    #[test]
    fn question_named_by_id_and_number_is_an_error() {
        // Fresh maps get fresh hash seeds, so iteration order varies.
        for _ in 0..20 {
            let raw = HashMap::from([
                ("1".to_string(), vec!["Red".to_string()]),
                ("q-colors".to_string(), vec!["Blue".to_string()]),
            ]);
            let err = resolve_answers(&questions(), raw).unwrap_err();
            assert_eq!(
                err.to_string(),
                "question 1 is answered twice, as '1' and as 'q-colors'"
            );
        }
    }

    #[test]
    fn both_file_layouts_parse() {
        let plain: AnswersFile = serde_json::from_str(r#"{"1": ["Red"]}"#).unwrap();
        assert!(matches!(plain, AnswersFile::Plain(ref m) if m["1"] == vec!["Red"]));

        let full: AnswersFile = serde_json::from_str(
            r#"{"answers": {"1": ["Red"]}, "time_taken_seconds": 30.0}"#,
        )
        .unwrap();
        match full {
            AnswersFile::Full(submission) => {
                assert_eq!(submission.time_taken_seconds, Some(30.0));
                assert_eq!(submission.answers["1"], vec!["Red"]);
            }
            AnswersFile::Plain(_) => panic!("expected the full layout"),
        }
    }
}
