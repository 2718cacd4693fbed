//! Check functions
//!
//! Each check is a pure function of the report text and a reference value.
//! A missing extraction is a normal failed result, never an error.

use crate::extract::{extract_stock_price, extract_ticker};
use crate::result::{CheckKind, CheckResult};
use crate::text::{char_len, count_present};
use serde_json::Value;

/// Keyword lists used by the heuristic checks
mod keywords {
    pub const FINANCIAL_NEWS: &[&str] = &[
        "earnings",
        "revenue",
        "profit",
        "loss",
        "stock",
        "market",
        "investor",
        "quarterly",
        "annual",
        "growth",
        "decline",
        "analyst",
        "rating",
        "dividend",
        "buyback",
        "merger",
        "acquisition",
        "ipo",
        "sec",
    ];

    pub const ERROR_INDICATORS: &[&str] = &[
        "error",
        "failed",
        "unable",
        "not found",
        "rate limit",
        "timeout",
        "connection",
        "network",
        "api",
        "service unavailable",
    ];

    pub const ERROR_REPORTING: &[&str] = &["error", "failed", "unable"];
}

/// Relative tolerance for price matching
const PRICE_TOLERANCE: f64 = 0.01;
const NEWS_RELEVANCE_PASS: f64 = 0.3;
const MIN_NEWS_CHARS: usize = 100;
const MIN_COMPLETE_REPORT_CHARS: usize = 200;

fn price_value(price: Option<f64>) -> Value {
    price.map_or(Value::Null, Value::from)
}

/// Does the first extracted price match `expected` within 1%?
pub fn check_factual_consistency(report: &str, expected: f64) -> CheckResult {
    let Some(found) = extract_stock_price(report) else {
        return CheckResult::new(
            CheckKind::FactualConsistency,
            false,
            0.0,
            "No stock price found in report",
        )
        .with_field("expected", expected)
        .with_field("found", Value::Null);
    };

    let tolerance = expected.abs() * PRICE_TOLERANCE;
    let difference = (found - expected).abs();

    let (passed, details) = if difference <= tolerance {
        (
            true,
            format!("Price matches within tolerance ({difference:.2} difference)"),
        )
    } else {
        (
            false,
            format!(
                "Price mismatch: expected {expected}, found {found} (difference: {difference:.2})"
            ),
        )
    };

    CheckResult::new(
        CheckKind::FactualConsistency,
        passed,
        if passed { 1.0 } else { 0.0 },
        details,
    )
    .with_field("expected", expected)
    .with_field("found", found)
}

/// Is the first ticker-looking word the expected ticker?
pub fn check_ticker_accuracy(report: &str, expected: &str) -> CheckResult {
    let found = extract_ticker(report);
    let matched = found.is_some_and(|t| t.eq_ignore_ascii_case(expected.trim()));

    let details = match found {
        Some(t) if matched => format!("Ticker correctly identified as {t}"),
        _ => format!(
            "Ticker mismatch: expected {expected}, found {}",
            found.unwrap_or("none")
        ),
    };

    CheckResult::new(
        CheckKind::TickerAccuracy,
        matched,
        if matched { 1.0 } else { 0.0 },
        details,
    )
    .with_field("expected", expected)
    .with_field("found", found.map_or(Value::Null, Value::from))
}

/// Is the extracted price inside the inclusive 52-week range?
pub fn check_price_range(report: &str, high: f64, low: f64) -> CheckResult {
    let expected_range = format!("{low:.2} - {high:.2}");
    let found = extract_stock_price(report);

    let (passed, details) = match found {
        None => (false, "No price found in report".to_string()),
        Some(price) if (low..=high).contains(&price) => {
            (true, format!("Price {price:.2} within 52-week range"))
        }
        Some(price) => (false, format!("Price {price:.2} outside 52-week range")),
    };

    CheckResult::new(
        CheckKind::PriceRange,
        passed,
        if passed { 1.0 } else { 0.0 },
        details,
    )
    .with_field("expected_range", expected_range)
    .with_field("found", price_value(found))
}

/// Financial keyword density, expecting about one keyword per 100 characters
pub fn check_news_relevance(report: &str) -> CheckResult {
    let keyword_count = count_present(&report.to_lowercase(), keywords::FINANCIAL_NEWS);
    let len = char_len(report);

    if len < MIN_NEWS_CHARS {
        return CheckResult::new(
            CheckKind::NewsRelevance,
            false,
            0.0,
            "Report too short to evaluate news relevance",
        )
        .with_field("keyword_count", keyword_count);
    }

    let expected_keywords = len as f64 / 100.0;
    let score = (keyword_count as f64 / expected_keywords).min(1.0);

    CheckResult::new(
        CheckKind::NewsRelevance,
        score >= NEWS_RELEVANCE_PASS,
        score,
        format!("Found {keyword_count} financial keywords, relevance score: {score:.2}"),
    )
    .with_field("keyword_count", keyword_count)
}

/// Did the pipeline fail loudly rather than silently?
///
/// Reports that mention errors pass only when they say so plainly. A short
/// report with no error mentions is treated as a possible silent failure.
pub fn check_graceful_failure(report: &str) -> CheckResult {
    let lower = report.to_lowercase();
    let error_count = count_present(&lower, keywords::ERROR_INDICATORS);
    let has_error_reporting = count_present(&lower, keywords::ERROR_REPORTING) > 0;
    let is_too_short = char_len(report.trim()) < MIN_COMPLETE_REPORT_CHARS;

    let (passed, score, details) = if error_count > 0 && has_error_reporting {
        (
            true,
            0.8,
            format!("System failed gracefully with clear error reporting ({error_count} error indicators)"),
        )
    } else if error_count > 0 {
        (
            false,
            0.2,
            format!("System failed but error reporting was unclear ({error_count} error indicators)"),
        )
    } else if is_too_short {
        (
            false,
            0.5,
            "Report is unusually short, may indicate silent failure".to_string(),
        )
    } else {
        (
            true,
            1.0,
            "No errors detected, system appears to have completed successfully".to_string(),
        )
    };

    CheckResult::new(CheckKind::GracefulFailure, passed, score, details)
        .with_field("error_count", error_count)
        .with_field("report_length", char_len(report))
}

/// Does the report mention the sector or any of its related keywords?
pub fn check_sector_relevance(report: &str, sector: &str, sector_keywords: &[String]) -> CheckResult {
    let lower = report.to_lowercase();

    let (passed, score, details) = if lower.contains(&sector.to_lowercase()) {
        (true, 1.0, format!("Sector \"{sector}\" found in report"))
    } else {
        let matches = sector_keywords
            .iter()
            .filter(|kw| lower.contains(&kw.to_lowercase()))
            .count();
        if matches > 0 {
            (true, 0.8, format!("Found {matches} sector-related keywords"))
        } else {
            (
                false,
                0.3,
                format!("No sector \"{sector}\" or related keywords found"),
            )
        }
    };

    CheckResult::new(CheckKind::SectorRelevance, passed, score, details)
        .with_field("expected_sector", sector)
}
