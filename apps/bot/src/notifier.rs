use std::sync::Arc;

use anyhow::Result;
use market::{Database, PriceClient, ReportBuilder, render_trend};
use serenity::all::{ChannelId, CreateAttachment, CreateMessage, Http};
use tracing::{error, info, instrument, warn};

/// One report cycle: build the text report, send it, then send a trend
/// chart for every priority symbol.
///
/// Store failures abort the cycle. Chat sends and per-symbol chart
/// rendering are best effort: a failure is logged and the remaining
/// symbols still go out.
#[instrument(
    name = "send_report",
    skip(http, builder, db, price_client),
    fields(channel_id = %channel)
)]
pub async fn send_report(
    http: Arc<Http>,
    channel: ChannelId,
    builder: Arc<ReportBuilder>,
    db: Arc<Database>,
    price_client: Arc<PriceClient>,
) -> Result<()> {
    let report = builder.build().await?;
    info!(bytes = report.len(), "report built");

    if let Err(e) = channel
        .send_message(&http, CreateMessage::new().content(report))
        .await
    {
        error!(error = ?e, "send report failed");
    }

    let priority = db.priority_list()?;
    info!(priority_symbols = priority.len(), "sending trend charts");

    let mut sent: usize = 0;
    let mut failed: usize = 0;

    for symbol in priority {
        let image_bytes = match render_trend(&price_client, &symbol).await {
            Ok(bytes) => bytes,
            Err(e) => {
                failed += 1;
                warn!(symbol = %symbol, error = ?e, "render trend failed");
                continue;
            }
        };

        let filename = format!("{symbol}_trend.png");
        let msg = CreateMessage::new().add_file(CreateAttachment::bytes(image_bytes, filename));

        match channel.send_message(&http, msg).await {
            Ok(_) => sent += 1,
            Err(e) => {
                failed += 1;
                warn!(symbol = %symbol, error = ?e, "send chart failed");
            }
        }
    }

    info!(sent, failed, "report cycle completed");
    Ok(())
}
