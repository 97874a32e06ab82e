//! The `quizsmith delete-attempt` command.

use anyhow::Result;

use super::Context;

pub async fn execute(ctx: &Context, attempt_id: &str) -> Result<()> {
    let service = ctx.offline_service()?;
    service.delete_attempt(&ctx.user, attempt_id).await?;
    println!("Deleted attempt {attempt_id}");
    Ok(())
}
