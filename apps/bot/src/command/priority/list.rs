use log::info;

use crate::{Context, Error};

/// Show the current priority set, or a fixed message when it is empty.
#[poise::command(slash_command)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let user_id = ctx.author().id.get();
    let priority = ctx.data().db.priority_list()?;
    info!("list: invoked user_id={user_id} count={}", priority.len());

    let reply = if priority.is_empty() {
        "Nenhum ativo prioritário.".to_string()
    } else {
        format!("🌟 Prioritários:\n{}", priority.join("\n"))
    };

    ctx.say(reply).await?;

    Ok(())
}
