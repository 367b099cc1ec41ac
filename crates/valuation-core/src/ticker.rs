//! Ticker normalization

use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Suggestions shown on the home view
pub const POPULAR_TICKERS: [&str; 8] = [
    "PETR4.SA", "VALE3.SA", "BBAS3.SA", "ITSA4.SA", "MC.PA", "ASML.AS", "SAP.DE", "LVMH.PA",
];

#[allow(clippy::unwrap_used)]
static TICKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9.\-^=]{1,20}$").unwrap());

/// Trim and uppercase user input, rejecting anything that cannot be a symbol
pub fn normalize_ticker(input: &str) -> Result<String, ValidationError> {
    let ticker = input.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(ValidationError::new("ticker", "must not be empty"));
    }
    if !TICKER_PATTERN.is_match(&ticker) {
        return Err(ValidationError::new(
            "ticker",
            "only letters, digits and . - ^ = are allowed (at most 20 characters)",
        ));
    }
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_ticker("  petr4.sa ").unwrap(), "PETR4.SA");
        assert_eq!(normalize_ticker("^bvsp").unwrap(), "^BVSP");
        assert_eq!(normalize_ticker("brl=x").unwrap(), "BRL=X");
        assert_eq!(normalize_ticker("BRK-B").unwrap(), "BRK-B");
    }

    #[test]
    fn test_rejects_empty() {
        let err = normalize_ticker("   ").unwrap_err();
        assert_eq!(err.field, "ticker");
        assert_eq!(err.reason, "must not be empty");
    }

    #[test]
    fn test_rejects_invalid_characters() {
        assert!(normalize_ticker("PETR4 SA").is_err());
        assert!(normalize_ticker("AAPL;DROP").is_err());
        assert!(normalize_ticker("A".repeat(21).as_str()).is_err());
    }

    #[test]
    fn test_popular_tickers_are_normalized() {
        for ticker in POPULAR_TICKERS {
            assert_eq!(normalize_ticker(ticker).unwrap(), ticker);
        }
    }
}
