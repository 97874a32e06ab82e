//! The `quizsmith import` command.

use std::path::Path;

use anyhow::Result;

use quizsmith_core::model::Difficulty;
use quizsmith_core::service::QuizDetails;

use super::{print_quiz, read_text, Context};

pub async fn execute(
    ctx: &Context,
    raw: &Path,
    title: Option<String>,
    difficulty: Difficulty,
) -> Result<()> {
    let text = read_text(raw)?;
    let title = title.unwrap_or_else(|| {
        raw.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Imported quiz".to_string())
    });

    let service = ctx.offline_service()?;
    let imported = service
        .import_quiz(&ctx.user, &title, difficulty, &text)
        .await?;

    if imported.questions.is_empty() {
        eprintln!("Warning: no questions found in {}", raw.display());
    }
    eprintln!("Imported {} question(s).", imported.questions.len());

    print_quiz(
        &QuizDetails {
            quiz: imported.quiz,
            questions: imported.questions,
        },
        false,
    );
    Ok(())
}
