//! The `quizsmith quizzes` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::Context;

pub async fn execute(ctx: &Context, mine: bool) -> Result<()> {
    let service = ctx.offline_service()?;
    let quizzes = if mine {
        service.created_quizzes(&ctx.user).await?
    } else {
        service.quizzes().await?
    };

    if quizzes.is_empty() {
        println!("No quizzes yet. Run `quizsmith generate` or `quizsmith import` first.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Created", "Title", "Difficulty", "Questions", "Owner", "Id"]);
    for quiz in &quizzes {
        table.add_row(vec![
            Cell::new(quiz.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&quiz.title),
            Cell::new(quiz.difficulty),
            Cell::new(quiz.num_questions),
            Cell::new(&quiz.owner_id),
            Cell::new(&quiz.id),
        ]);
    }
    println!("{table}");
    println!("{} quiz(zes)", quizzes.len());

    Ok(())
}
