use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;

use crate::{Database, PriceClient};

pub const REPORT_HEADER: &str = "💹 **Relatório de Ações/FIIs**\n\n";

/// Per-ticker indicator, first match wins:
/// Alert for priority symbols moving at least the threshold, then Up/Down
/// for moves strictly beyond it, Neutral otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Alert,
    Up,
    Down,
    Neutral,
}

impl Indicator {
    pub fn symbol(self) -> &'static str {
        match self {
            Indicator::Alert => "⚠️",
            Indicator::Up => "📈",
            Indicator::Down => "📉",
            Indicator::Neutral => "🔹",
        }
    }
}

/// Percent change from `previous` to `current`, defined as 0 when the
/// previous price is exactly 0.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

pub fn classify(change: f64, is_priority: bool, threshold: f64) -> Indicator {
    if is_priority && change.abs() >= threshold {
        Indicator::Alert
    } else if change > threshold {
        Indicator::Up
    } else if change < -threshold {
        Indicator::Down
    } else {
        Indicator::Neutral
    }
}

/// Builds the periodic price report: fetches current closes for the tracked
/// universe, diffs them against the stored previous prices, and advances the
/// store so the next cycle compares against this one.
pub struct ReportBuilder {
    db: Arc<Database>,
    client: Arc<PriceClient>,
    normals: Vec<String>,
    threshold: f64,
}

impl ReportBuilder {
    pub fn new(
        db: Arc<Database>,
        client: Arc<PriceClient>,
        normals: Vec<String>,
        threshold: f64,
    ) -> Self {
        Self {
            db,
            client,
            normals,
            threshold,
        }
    }

    /// Priority set union the fixed normal list, de-duplicated, first seen
    /// first.
    pub fn tracked_universe(&self, priority: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        priority
            .iter()
            .chain(self.normals.iter())
            .filter(|t| seen.insert((*t).clone()))
            .cloned()
            .collect()
    }

    pub async fn build(&self) -> Result<String> {
        let priority = self.db.priority_list()?;
        let universe = self.tracked_universe(&priority);
        let prices = self.client.fetch_latest(&universe).await;
        self.compose(&priority, &universe, &prices)
    }

    /// Pure with respect to the network: takes already-fetched prices.
    /// Store reads/writes still happen here and their failure aborts the
    /// whole report.
    pub fn compose(
        &self,
        priority: &[String],
        universe: &[String],
        prices: &HashMap<String, Option<f64>>,
    ) -> Result<String> {
        let mut report = String::from(REPORT_HEADER);

        for ticker in universe {
            // Absent quote counts as 0 so one bad symbol never sinks the report.
            let current = prices.get(ticker).copied().flatten().unwrap_or(0.0);
            // Cold start: no prior record means no movement to show.
            let previous = self.db.last_price(ticker)?.unwrap_or(current);
            let change = percent_change(current, previous);

            self.db.set_price(ticker, current)?;

            let indicator = classify(change, priority.contains(ticker), self.threshold);
            report.push_str(&format!(
                "{} **{}**: R$ {:.2} ({:+.2}%)\n",
                indicator.symbol(),
                ticker,
                current,
                change
            ));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(db: Arc<Database>, normals: &[&str]) -> ReportBuilder {
        let client = Arc::new(
            PriceClient::new("http://localhost".into(), "key".into(), "secret".into()).unwrap(),
        );
        ReportBuilder::new(
            db,
            client,
            normals.iter().map(|s| s.to_string()).collect(),
            2.0,
        )
    }

    fn prices(entries: &[(&str, Option<f64>)]) -> HashMap<String, Option<f64>> {
        entries
            .iter()
            .map(|(t, p)| (t.to_string(), *p))
            .collect()
    }

    #[test]
    fn percent_change_is_zero_when_previous_is_zero() {
        assert_eq!(percent_change(10.0, 0.0), 0.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(-3.0, 0.0), 0.0);
    }

    #[test]
    fn percent_change_basic() {
        assert_eq!(percent_change(31.5, 30.0), 5.0);
        assert_eq!(percent_change(28.5, 30.0), -5.0);
    }

    #[test]
    fn classify_alert_wins_regardless_of_sign() {
        assert_eq!(classify(5.0, true, 2.0), Indicator::Alert);
        assert_eq!(classify(-5.0, true, 2.0), Indicator::Alert);
        assert_eq!(classify(2.0, true, 2.0), Indicator::Alert);
    }

    #[test]
    fn classify_up_and_down_are_strict() {
        assert_eq!(classify(2.1, false, 2.0), Indicator::Up);
        assert_eq!(classify(-2.1, false, 2.0), Indicator::Down);
        assert_eq!(classify(2.0, false, 2.0), Indicator::Neutral);
        assert_eq!(classify(-2.0, false, 2.0), Indicator::Neutral);
        assert_eq!(classify(0.0, true, 2.0), Indicator::Neutral);
    }

    #[test]
    fn tracked_universe_deduplicates() {
        let db = Arc::new(Database::open(":memory:").unwrap());
        let b = builder(db, &["ABEV3.SA", "PETR4.SA"]);
        let universe = b.tracked_universe(&["PETR4.SA".to_string()]);
        assert_eq!(universe, vec!["PETR4.SA", "ABEV3.SA"]);
    }

    #[test]
    fn cold_start_shows_zero_change_and_records_price() {
        let db = Arc::new(Database::open(":memory:").unwrap());
        let b = builder(db.clone(), &["ABEV3.SA"]);

        let report = b
            .compose(&[], &["ABEV3.SA".to_string()], &prices(&[("ABEV3.SA", Some(14.2))]))
            .unwrap();

        assert!(report.contains("🔹 **ABEV3.SA**: R$ 14.20 (+0.00%)"));
        assert_eq!(db.last_price("ABEV3.SA").unwrap(), Some(14.2));
    }

    #[test]
    fn priority_move_beyond_threshold_is_an_alert() {
        let db = Arc::new(Database::open(":memory:").unwrap());
        db.set_price("PETR4.SA", 30.0).unwrap();
        db.add_priority("PETR4.SA").unwrap();
        let b = builder(db.clone(), &["ABEV3.SA"]);

        let priority = db.priority_list().unwrap();
        let universe = b.tracked_universe(&priority);
        let report = b
            .compose(
                &priority,
                &universe,
                &prices(&[("PETR4.SA", Some(31.5)), ("ABEV3.SA", Some(14.2))]),
            )
            .unwrap();

        assert!(report.starts_with(REPORT_HEADER));
        assert!(report.contains("⚠️ **PETR4.SA**: R$ 31.50 (+5.00%)"));
        assert!(report.contains("🔹 **ABEV3.SA**: R$ 14.20 (+0.00%)"));
        // Next cycle compares against this cycle's close.
        assert_eq!(db.last_price("PETR4.SA").unwrap(), Some(31.5));
    }

    #[test]
    fn non_priority_move_beyond_threshold_is_up_or_down() {
        let db = Arc::new(Database::open(":memory:").unwrap());
        db.set_price("VALE3.SA", 100.0).unwrap();
        db.set_price("ITUB4.SA", 100.0).unwrap();
        let b = builder(db, &["VALE3.SA", "ITUB4.SA"]);

        let universe = b.tracked_universe(&[]);
        let report = b
            .compose(
                &[],
                &universe,
                &prices(&[("VALE3.SA", Some(103.0)), ("ITUB4.SA", Some(97.0))]),
            )
            .unwrap();

        assert!(report.contains("📈 **VALE3.SA**: R$ 103.00 (+3.00%)"));
        assert!(report.contains("📉 **ITUB4.SA**: R$ 97.00 (-3.00%)"));
    }

    #[test]
    fn absent_quote_reports_zero_without_failing() {
        let db = Arc::new(Database::open(":memory:").unwrap());
        db.set_price("PETR4.SA", 30.0).unwrap();
        let b = builder(db, &["XPTO99.SA", "PETR4.SA"]);

        let universe = b.tracked_universe(&[]);
        let report = b
            .compose(
                &[],
                &universe,
                &prices(&[("XPTO99.SA", None), ("PETR4.SA", Some(30.0))]),
            )
            .unwrap();

        assert!(report.contains("🔹 **XPTO99.SA**: R$ 0.00 (+0.00%)"));
        assert!(report.contains("🔹 **PETR4.SA**: R$ 30.00 (+0.00%)"));
    }
}
