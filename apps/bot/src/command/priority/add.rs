use log::{debug, info, warn};

use crate::{Context, Error};

use super::single_ticker;

/// Mark a ticker as priority: alerted on threshold moves and charted on
/// every report.
#[poise::command(slash_command)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Ticker do ativo (ex: PETR4.SA)"] ticker: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let user_id = ctx.author().id.get();
    info!("add: invoked user_id={user_id} raw_input={ticker}");

    let Some(ticker) = single_ticker(&ticker) else {
        warn!("add: malformed input user_id={user_id} raw_input={ticker}");
        ctx.say("Use: /add TICKER").await?;
        return Ok(());
    };

    let newly_added = ctx.data().db.add_priority(&ticker)?;
    debug!("add: user_id={user_id} ticker={ticker} newly_added={newly_added}");

    ctx.say(format!("✅ Adicionado aos prioritários: {ticker}"))
        .await?;

    Ok(())
}
