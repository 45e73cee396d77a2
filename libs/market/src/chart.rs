use anyhow::{Error, Result, ensure};
use charming::{
    Chart, ImageFormat, ImageRenderer,
    component::{Axis, Title},
    element::{AxisType, LineStyle, Symbol, TextStyle},
    series::Line,
};

use crate::PriceClient;

const HISTORY_DAYS: i64 = 7;
const WIDTH: u32 = 400;
const HEIGHT: u32 = 300;

/// Render a 7-day trend chart for `symbol` as in-memory PNG bytes.
///
/// Pulls daily closes fresh on every call; nothing is cached and nothing
/// touches disk. Rasterization is CPU-bound, so it runs off the runtime.
pub async fn render_trend(client: &PriceClient, symbol: &str) -> Result<Vec<u8>> {
    let bars = client.fetch_history(symbol, HISTORY_DAYS).await?;
    ensure!(!bars.is_empty(), "no history returned for {}", symbol);

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let dates: Vec<String> = bars
        .iter()
        .map(|b| b.timestamp.format("%Y-%m-%d").to_string())
        .collect();

    let symbol = symbol.to_string();
    tokio::task::spawn_blocking(move || generate_chart(&symbol, &closes, &dates)).await?
}

/// Line chart of daily closes with markers and gridlines.
pub fn generate_chart(symbol: &str, closes: &[f64], dates: &[String]) -> Result<Vec<u8>, Error> {
    ensure!(!closes.is_empty(), "closes is empty");
    ensure!(
        closes.len() == dates.len(),
        "length mismatch: closes={}, dates={}",
        closes.len(),
        dates.len()
    );

    let last_close = *closes.last().unwrap_or(&0.0);

    let chart = Chart::new()
        .background_color("#ffffff")
        .title(
            Title::new()
                .text(format!("{} | R$ {:.2}", symbol.to_uppercase(), last_close))
                .left("center")
                .top("2%")
                .text_style(TextStyle::new().color("#111111").font_size(14)),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(dates.to_vec())
                .axis_label(
                    charming::element::AxisLabel::new()
                        .rotate(45)
                        .color("#606060"),
                )
                .split_line(
                    charming::element::SplitLine::new()
                        .line_style(charming::element::LineStyle::new().color("#d9d9d9")),
                ),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .scale(true)
                .axis_label(charming::element::AxisLabel::new().color("#606060"))
                .split_line(
                    charming::element::SplitLine::new()
                        .line_style(charming::element::LineStyle::new().color("#d9d9d9")),
                ),
        )
        .series(
            Line::new()
                .name("Close")
                .data(closes.to_vec())
                .symbol(Symbol::Circle)
                .line_style(LineStyle::new().width(2).color("#0064FF")),
        );

    let mut renderer = ImageRenderer::new(WIDTH, HEIGHT);
    let png_bytes = renderer.render_format(ImageFormat::Png, &chart)?;
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_series() {
        assert!(generate_chart("PETR4.SA", &[], &[]).is_err());
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let closes = [30.0, 31.5];
        let dates = ["2026-08-24".to_string()];
        assert!(generate_chart("PETR4.SA", &closes, &dates).is_err());
    }
}
