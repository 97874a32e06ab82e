//! The `quizsmith show` command.

use anyhow::Result;

use super::{print_quiz, Context};

pub async fn execute(ctx: &Context, quiz_id: &str, reveal: bool) -> Result<()> {
    let service = ctx.offline_service()?;
    let details = service.quiz(quiz_id).await?;
    print_quiz(&details, reveal);
    Ok(())
}
