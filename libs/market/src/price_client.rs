use std::collections::HashMap;

use anyhow::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use log::warn;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue},
};
use serde::Deserialize;

/// The provider throttles large symbol batches, so latest-close requests
/// are chunked and issued sequentially.
const BATCH_SIZE: usize = 50;

#[derive(Clone)]
pub struct PriceClient {
    client: Client,
    base_api: String,
}

impl PriceClient {
    pub fn new(base_api: String, key_id: String, secret: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("APCA-API-KEY-ID", HeaderValue::from_str(&key_id)?);
        headers.insert("APCA-API-SECRET-KEY", HeaderValue::from_str(&secret)?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_api })
    }

    pub fn from_env() -> Result<Self> {
        let base_api = std::env::var("APCA_API_BASE_URL")?;
        let key_id = std::env::var("APCA_API_KEY_ID")?;
        let secret = std::env::var("APCA_API_SECRET_KEY")?;
        Self::new(base_api, key_id, secret)
    }

    /// Latest daily close for each requested symbol.
    ///
    /// A symbol the provider cannot answer for (unknown symbol, no data,
    /// failed chunk request) maps to `None` instead of failing the batch.
    pub async fn fetch_latest(&self, symbols: &[String]) -> HashMap<String, Option<f64>> {
        let mut out = HashMap::with_capacity(symbols.len());

        for chunk in symbols.chunks(BATCH_SIZE) {
            match self.fetch_chunk(chunk).await {
                Ok(bars) => {
                    for symbol in chunk {
                        let close = bars
                            .get(symbol)
                            .and_then(|series| series.last())
                            .map(|bar| bar.close);
                        if close.is_none() {
                            warn!("fetch_latest: no close for symbol={symbol}");
                        }
                        out.insert(symbol.clone(), close);
                    }
                }
                Err(e) => {
                    warn!("fetch_latest: chunk of {} failed: {e:?}", chunk.len());
                    for symbol in chunk {
                        out.insert(symbol.clone(), None);
                    }
                }
            }
        }

        out
    }

    async fn fetch_chunk(&self, symbols: &[String]) -> Result<HashMap<String, Vec<Bar>>, Error> {
        let end = Utc::now();
        let start = end - Duration::days(7);

        let url = format!("{}/v2/stocks/bars", self.base_api.trim_end_matches('/'));
        let joined = symbols.join(",");
        let start = start.to_rfc3339();
        let end = end.to_rfc3339();

        let res: MultiBarsResponse = self
            .client
            .get(url)
            .query(&[
                ("feed", "iex"),
                ("symbols", joined.as_str()),
                ("timeframe", "1Day"),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("limit", "10000"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(res.bars.unwrap_or_default())
    }

    /// Ordered daily bars for one symbol over the trailing `days` window.
    /// Failures propagate; the caller decides how to isolate them.
    pub async fn fetch_history(&self, symbol: &str, days: i64) -> Result<Vec<Bar>, Error> {
        let end = Utc::now();
        let start = end - Duration::days(days);

        let url = format!(
            "{}/v2/stocks/{}/bars",
            self.base_api.trim_end_matches('/'),
            symbol
        );

        let start = start.to_rfc3339();
        let end = end.to_rfc3339();
        let limit = days.to_string();

        let res: BarsResponse = self
            .client
            .get(url)
            .query(&[
                ("feed", "iex"),
                ("timeframe", "1Day"),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(res.bars.unwrap_or_default())
    }
}

//
// Match Alpaca API JSON
// https://docs.alpaca.markets/reference/stockbars
//
#[derive(Debug, Deserialize, Clone)]
pub struct BarsResponse {
    pub bars: Option<Vec<Bar>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MultiBarsResponse {
    pub bars: Option<HashMap<String, Vec<Bar>>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Bar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "o")]
    pub open: f64,

    #[serde(rename = "h")]
    pub high: f64,

    #[serde(rename = "l")]
    pub low: f64,

    #[serde(rename = "c")]
    pub close: f64,

    #[serde(rename = "v")]
    pub volume: i64,
}
