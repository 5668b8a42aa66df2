//! Ticker list parsing for multi-ticker runs.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickerListError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),

    #[error("invalid ticker symbol: {0}")]
    InvalidSymbol(String),
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}

/// Splits a comma-separated list into upper-cased, unique symbols.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, TickerListError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(TickerListError::EmptyToken);
        }
        if !trimmed.chars().all(is_symbol_char) {
            return Err(TickerListError::InvalidSymbol(trimmed.to_string()));
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(TickerListError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_list() {
        assert_eq!(parse_tickers("AAPL,MSFT,GOOGL").unwrap(), vec!["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(parse_tickers("  aapl , msft ,brk.b").unwrap(), vec!["AAPL", "MSFT", "BRK.B"]);
    }

    #[test]
    fn index_and_future_symbols() {
        assert_eq!(parse_tickers("^GSPC,ES=F").unwrap(), vec!["^GSPC", "ES=F"]);
    }

    #[test]
    fn empty_token_rejected() {
        assert_eq!(parse_tickers("AAPL,,MSFT"), Err(TickerListError::EmptyToken));
        assert_eq!(parse_tickers(""), Err(TickerListError::EmptyToken));
    }

    #[test]
    fn duplicate_detected_case_insensitively() {
        assert_eq!(
            parse_tickers("AAPL,msft,aapl"),
            Err(TickerListError::DuplicateTicker("AAPL".to_string()))
        );
    }

    #[test]
    fn path_characters_rejected() {
        assert!(matches!(
            parse_tickers("../etc"),
            Err(TickerListError::InvalidSymbol(_))
        ));
    }
}
