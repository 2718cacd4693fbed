//! Pull structured values out of free-form report text

use regex::Regex;
use std::sync::LazyLock;

/// Tried in priority order; the first pattern with a parseable match wins
static PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\$(\d+\.?\d*)",
        r"(?i)price[:\s]*(\d+\.?\d*)",
        r"(?i)current[:\s]*(\d+\.?\d*)",
        r"(?i)(\d+\.?\d*)\s*USD",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid price pattern"))
    .collect()
});

static TICKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{1,6})\b").expect("valid ticker pattern"));

/// First stock price mentioned in the report
///
/// Only the first match of each pattern is considered. If it does not parse
/// as a number the next pattern is tried.
pub fn extract_stock_price(text: &str) -> Option<f64> {
    PRICE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    })
}

/// First standalone run of 1-6 uppercase letters
///
/// There is no stop-word list, so words like "CEO" or "USD" appearing before
/// the ticker will be picked up instead.
pub fn extract_ticker(text: &str) -> Option<&str> {
    TICKER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_price() {
        assert_eq!(extract_stock_price("Apple closed at $189.50 on Friday."), Some(189.5));
        assert_eq!(extract_stock_price("Up from $12 to $15"), Some(12.0));
    }

    #[test]
    fn test_pattern_priority() {
        // "$" wins even when a "price:" mention comes first in the text
        let text = "Price: 101.00, last trade $99.50";
        assert_eq!(extract_stock_price(text), Some(99.5));

        assert_eq!(extract_stock_price("Stock PRICE: 42.10 today"), Some(42.1));
        assert_eq!(extract_stock_price("current 77.7"), Some(77.7));
        assert_eq!(extract_stock_price("Trading near 310.25 usd"), Some(310.25));
    }

    #[test]
    fn test_no_price() {
        assert_eq!(extract_stock_price("No numbers here."), None);
        assert_eq!(extract_stock_price(""), None);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "The current price: 250.75 USD, or $250.75.";
        let first = extract_stock_price(text);
        assert_eq!(first, extract_stock_price(text));
        assert_eq!(first, Some(250.75));
    }

    #[test]
    fn test_ticker() {
        assert_eq!(extract_ticker("Apple Inc. (AAPL) reported earnings"), Some("AAPL"));
        assert_eq!(extract_ticker("the company is doing fine"), None);
        assert_eq!(extract_ticker("Shares of TSLA rose"), Some("TSLA"));
    }

    #[test]
    fn test_ticker_has_no_stop_words() {
        assert_eq!(extract_ticker("Our CEO said MSFT is strong"), Some("CEO"));
        // Seven capitals is not a ticker
        assert_eq!(extract_ticker("ABCDEFG then NVDA"), Some("NVDA"));
    }
}
