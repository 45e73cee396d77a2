mod add;
mod list;
mod remove;

pub use add::add;
pub use list::list;
pub use remove::remove;

/// Exactly one whitespace-separated token, upper-cased. Anything else is a
/// malformed invocation.
fn single_ticker(raw: &str) -> Option<String> {
    let mut tokens = raw.split_whitespace();
    let ticker = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(ticker.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::single_ticker;

    #[test]
    fn accepts_one_token_and_uppercases() {
        assert_eq!(single_ticker(" hgld11 "), Some("HGLD11".to_string()));
        assert_eq!(single_ticker("petr4.sa"), Some("PETR4.SA".to_string()));
    }

    #[test]
    fn rejects_empty_and_multi_token_input() {
        assert_eq!(single_ticker(""), None);
        assert_eq!(single_ticker("   "), None);
        assert_eq!(single_ticker("PETR4.SA VALE3.SA"), None);
    }
}
