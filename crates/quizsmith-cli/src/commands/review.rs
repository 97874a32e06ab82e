//! The `quizsmith review` command.

use std::path::PathBuf;

use anyhow::Result;

use quizsmith_core::scoring::option_label;
use quizsmith_report::write_attempt_html;

use super::Context;

pub async fn execute(ctx: &Context, attempt_id: &str, html: Option<PathBuf>, json: bool) -> Result<()> {
    let service = ctx.offline_service()?;
    let review = service.attempt_review(&ctx.user, attempt_id).await?;

    if let Some(path) = &html {
        write_attempt_html(&review, path)?;
        eprintln!("HTML report written to {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&review)?);
        return Ok(());
    }

    println!("{} [{}]", review.quiz_title, review.quiz_difficulty);
    println!(
        "Completed {} in {:.0}s",
        review.completed_at.format("%Y-%m-%d %H:%M"),
        review.time_taken_seconds
    );

    for (number, question) in review.questions.iter().enumerate() {
        let verdict = if question.is_correct { "correct" } else { "wrong" };
        println!();
        println!("{}. {} [{verdict}]", number + 1, question.text);

        let labels = question.correct_answers.labels();
        for (index, option) in question.options.iter().enumerate() {
            let label = option_label(index);
            let correct = label.is_some_and(|l| labels.iter().any(|c| c.as_str() == l.to_string()));
            let selected = question.user_selected_answers.contains(option);
            let marker = match (selected, correct) {
                (true, true) => "[x] ok",
                (true, false) => "[x]   ",
                (false, true) => "[ ] ok",
                (false, false) => "[ ]   ",
            };
            println!("   {marker} {}. {option}", label.unwrap_or('?'));
        }

        let unknown: Vec<&str> = question
            .user_selected_answers
            .iter()
            .filter(|s| !question.options.contains(s))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            println!("   Also selected: {}", unknown.join(", "));
        }
        if question.correct_answers.is_unseen() {
            println!("   (no correct answers were recorded for this question)");
        }
    }

    println!();
    println!(
        "Score: {}/{} ({:.1}%)",
        review.correct_answers, review.total_questions, review.score
    );
    Ok(())
}
