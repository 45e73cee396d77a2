use log::{debug, info, warn};

use crate::{Context, Error};

use super::single_ticker;

/// Drop a ticker from the priority set.
///
/// Removing an absent ticker still confirms; there is nothing to undo.
#[poise::command(slash_command)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Ticker do ativo (ex: PETR4.SA)"] ticker: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let user_id = ctx.author().id.get();
    info!("remove: invoked user_id={user_id} raw_input={ticker}");

    let Some(ticker) = single_ticker(&ticker) else {
        warn!("remove: malformed input user_id={user_id} raw_input={ticker}");
        ctx.say("Use: /remove TICKER").await?;
        return Ok(());
    };

    let existed = ctx.data().db.remove_priority(&ticker)?;
    debug!("remove: user_id={user_id} ticker={ticker} existed={existed}");

    ctx.say(format!("❌ Removido dos prioritários: {ticker}"))
        .await?;

    Ok(())
}
