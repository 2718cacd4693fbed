//! Metric primitives: latency, cost, and prose quality
//!
//! Each function turns raw inputs into a single graded [`CheckResult`].

use crate::analyzer::TextAnalyzer;
use crate::config::CostRate;
use crate::error::EvalError;
use crate::result::{CheckKind, CheckResult};
use crate::text;
use crate::tokens::{TokenCounter, TokenSource};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Responses at or under this many seconds pass
pub const RESPONSE_TIME_PASS_SECS: f64 = 60.0;

/// Estimated costs at or under this many dollars pass
pub const COST_PASS_DOLLARS: f64 = 0.10;

/// Content quality scores at or above this pass
pub const QUALITY_PASS_SCORE: f64 = 0.6;

/// Section keywords a complete report mentions
pub const REQUIRED_SECTIONS: [&str; 5] = ["summary", "financial", "news", "insights", "risk"];

const MIN_QUALITY_CHARS: usize = 50;

/// Grade the time between two instants
pub fn measure_response_time(start: Instant, end: Instant) -> CheckResult {
    grade_response_time(end.saturating_duration_since(start).as_secs_f64())
}

/// Grade an elapsed time in seconds
pub fn grade_response_time(secs: f64) -> CheckResult {
    let (score, grade) = if secs <= 30.0 {
        (1.0, "excellent")
    } else if secs <= RESPONSE_TIME_PASS_SECS {
        (0.8, "good")
    } else if secs <= 120.0 {
        (0.5, "poor")
    } else {
        (0.2, "unacceptable")
    };

    CheckResult::new(
        CheckKind::ResponseTime,
        secs <= RESPONSE_TIME_PASS_SECS,
        score,
        format!("Response time: {secs:.2}s ({grade})"),
    )
    .with_field("response_time", secs)
    .with_field("grade", grade)
}

/// Tokenize the input and output text and grade the estimated cost
pub fn measure_cost_efficiency(
    counter: &dyn TokenCounter,
    rates: &BTreeMap<String, CostRate>,
    input_text: &str,
    output_text: &str,
    model: &str,
) -> CheckResult {
    grade_cost(
        rates,
        counter.count(input_text),
        counter.count(output_text),
        model,
        TokenSource::Estimated,
    )
}

/// Grade the cost of a request with known token counts
///
/// A model missing from `rates` costs nothing and therefore grades as
/// excellent; `rate_known` is false in that case.
pub fn grade_cost(
    rates: &BTreeMap<String, CostRate>,
    input_tokens: usize,
    output_tokens: usize,
    model: &str,
    source: TokenSource,
) -> CheckResult {
    let rate = rates.get(model);
    if rate.is_none() {
        warn!(model, "No cost rate for model, reporting zero cost");
    }
    let estimated_cost = rate.map_or(0.0, |r| r.cost(input_tokens, output_tokens));
    let total_tokens = input_tokens + output_tokens;

    let (score, grade) = if estimated_cost <= 0.05 {
        (1.0, "excellent")
    } else if estimated_cost <= COST_PASS_DOLLARS {
        (0.8, "good")
    } else if estimated_cost <= 0.20 {
        (0.5, "poor")
    } else {
        (0.2, "expensive")
    };

    CheckResult::new(
        CheckKind::CostEfficiency,
        estimated_cost <= COST_PASS_DOLLARS,
        score,
        format!("Cost: ${estimated_cost:.4}, Tokens: {total_tokens} ({grade})"),
    )
    .with_field("estimated_cost", estimated_cost)
    .with_field("total_tokens", total_tokens)
    .with_field("input_tokens", input_tokens)
    .with_field("output_tokens", output_tokens)
    .with_field("model", model)
    .with_field("rate_known", rate.is_some())
    .with_field("token_source", source.as_str())
}

/// Fraction of [`REQUIRED_SECTIONS`] mentioned anywhere in the report
pub fn section_completeness(report: &str) -> f64 {
    let lower = report.to_lowercase();
    text::count_present(&lower, &REQUIRED_SECTIONS) as f64 / REQUIRED_SECTIONS.len() as f64
}

/// Score prose quality with the analyzer, degrading if it cannot score the text
pub fn evaluate_content_quality(report: &str, analyzer: &dyn TextAnalyzer) -> CheckResult {
    if text::char_len(report.trim()) < MIN_QUALITY_CHARS {
        return CheckResult::new(
            CheckKind::ContentQuality,
            false,
            0.0,
            "Report too short or empty",
        )
        .with_field("sentiment", 0.0)
        .with_field("readability", 0.0)
        .with_field("completeness", 0.0);
    }

    let completeness = section_completeness(report);

    match analyzer.analyze(report) {
        Ok(scores) => {
            let quality = (scores.sentiment + 1.0) / 2.0 * 0.3
                + scores.readability / 100.0 * 0.4
                + completeness * 0.3;

            CheckResult::new(
                CheckKind::ContentQuality,
                quality >= QUALITY_PASS_SCORE,
                quality,
                format!(
                    "Quality score: {quality:.2} (sentiment: {:.2}, readability: {:.1}, completeness: {completeness:.2})",
                    scores.sentiment, scores.readability
                ),
            )
            .with_field("sentiment", scores.sentiment)
            .with_field("readability", scores.readability)
            .with_field("completeness", completeness)
            .with_field("analysis", analyzer.name())
        }
        Err(err) => {
            match &err {
                EvalError::AnalysisUnavailable => debug!("Using heuristic content quality"),
                EvalError::TextTooLong { len, max } => {
                    info!(len, max, "Report over the full analysis size limit, using heuristic content quality");
                }
                other => warn!(analyzer = analyzer.name(), error = %other, "Text analysis failed, using heuristic content quality"),
            }
            heuristic_quality(report, completeness, &err.to_string())
        }
    }
}

fn heuristic_quality(report: &str, completeness: f64, reason: &str) -> CheckResult {
    let length_score = (text::char_len(report) as f64 / 1000.0).min(1.0);
    let quality = completeness * 0.7 + length_score * 0.3;

    CheckResult::new(
        CheckKind::ContentQuality,
        quality >= QUALITY_PASS_SCORE,
        quality,
        format!(
            "Quality score: {quality:.2} (completeness: {completeness:.2}, length: {length_score:.2}) - basic analysis: {reason}"
        ),
    )
    .with_field("sentiment", 0.0)
    .with_field("readability", 0.0)
    .with_field("completeness", completeness)
    .with_field("analysis", "heuristic")
}

fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'i' | 'o' | 'u' | 'y'
            | 'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'æ'
            | 'è' | 'é' | 'ê' | 'ë'
            | 'ì' | 'í' | 'î' | 'ï'
            | 'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'œ'
            | 'ù' | 'ú' | 'û' | 'ü'
            | 'ý' | 'ÿ'
    )
}

/// Vowel-group syllable estimate
///
/// Counts runs of vowels (a, e, i, o, u, y and their accented Latin forms) in
/// the lowercased word, drops one for a trailing plain "e", and never returns
/// less than 1.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    let mut count: usize = 0;
    let mut on_vowel = false;

    for c in word.chars() {
        let vowel = is_vowel(c);
        if vowel && !on_vowel {
            count += 1;
        }
        on_vowel = vowel;
    }

    if word.ends_with('e') {
        count = count.saturating_sub(1);
    }
    count.max(1)
}

/// Flesch Reading Ease clamped to [0, 100]; 0.0 for text with no sentences or words
pub fn flesch_reading_ease(text: &str) -> f64 {
    let sentences = text::sentence_count(text);
    let words: Vec<&str> = text::words(text).collect();
    if sentences == 0 || words.is_empty() {
        return 0.0;
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    (206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word).clamp(0.0, 100.0)
}
