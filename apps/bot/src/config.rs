use std::env::var;

use chrono::NaiveTime;

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub channel_id: u64,
    pub db_path: String,
    pub alert_threshold: f64,
    pub normal_symbols: Vec<String>,
    pub report_times: Vec<NaiveTime>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            discord_token: var("DISCORD_TOKEN").expect("DISCORD_TOKEN not set"),
            channel_id: var("DISCORD_TARGET_CHANNEL_ID")
                .expect("DISCORD_TARGET_CHANNEL_ID not set")
                .parse()
                .expect("DISCORD_TARGET_CHANNEL_ID must be a numeric channel id"),
            db_path: var("DB_PATH").unwrap_or_else(|_| "ativos.db".to_string()),
            alert_threshold: var("ALERT_THRESHOLD")
                .ok()
                .map(|v| v.parse().expect("ALERT_THRESHOLD must be a number"))
                .unwrap_or(2.0),
            normal_symbols: parse_symbols(
                &var("NORMAL_SYMBOLS")
                    .unwrap_or_else(|_| "HGLG11.SA,BIDI11.SA,ABEV3.SA".to_string()),
            ),
            report_times: parse_times(
                &var("REPORT_TIMES").unwrap_or_else(|_| "10:00,12:00,15:00,17:00".to_string()),
            ),
        }
    }
}

fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_times(raw: &str) -> Vec<NaiveTime> {
    raw.split(',')
        .map(|t| {
            NaiveTime::parse_from_str(t.trim(), "%H:%M")
                .unwrap_or_else(|_| panic!("invalid REPORT_TIMES entry: {t}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_normalized_and_blank_entries_dropped() {
        assert_eq!(
            parse_symbols(" hglg11.sa, ABEV3.SA ,,"),
            vec!["HGLG11.SA", "ABEV3.SA"]
        );
    }

    #[test]
    fn times_parse_in_hh_mm() {
        let times = parse_times("10:00, 17:30");
        assert_eq!(
            times,
            vec![
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
            ]
        );
    }
}
