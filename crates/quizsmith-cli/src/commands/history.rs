//! The `quizsmith history` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizsmith_core::history::summarize_history;

use super::Context;

pub async fn execute(ctx: &Context, json: bool) -> Result<()> {
    let service = ctx.offline_service()?;
    let entries = service.history(&ctx.user).await?;
    let summary = summarize_history(&entries);

    if json {
        let output = serde_json::json!({
            "entries": entries,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No attempts recorded for {}.", ctx.user);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Completed", "Quiz", "Difficulty", "Score", "Time", "Attempt"]);
    for entry in &entries {
        table.add_row(vec![
            Cell::new(entry.completed_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&entry.quiz_title),
            Cell::new(entry.difficulty),
            Cell::new(format!(
                "{}/{} ({:.1}%)",
                entry.correct_answers, entry.total_questions, entry.score
            )),
            Cell::new(format!("{:.0}s", entry.time_taken_seconds)),
            Cell::new(&entry.attempt_id),
        ]);
    }
    println!("{table}");

    println!();
    println!(
        "{} attempt(s): {} correct, {} incorrect, overall {:.1}%, {:.0}s total",
        summary.attempts,
        summary.total_correct,
        summary.total_incorrect,
        summary.global_score,
        summary.total_time_seconds
    );

    let mut per_quiz: Vec<_> = summary.per_quiz.values().collect();
    per_quiz.sort_by(|a, b| a.quiz_title.cmp(&b.quiz_title));
    for stats in per_quiz {
        println!(
            "  {}: {} attempt(s), best {:.1}%, average {:.1}%",
            stats.quiz_title, stats.attempts, stats.best_score, stats.average_score
        );
    }

    Ok(())
}
