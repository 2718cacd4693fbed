//! Evaluation result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The checks a report can be scored against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    ResponseTime,
    CostEfficiency,
    ContentQuality,
    FactualConsistency,
    TickerAccuracy,
    PriceRange,
    NewsRelevance,
    GracefulFailure,
    SectorRelevance,
}

impl CheckKind {
    pub const ALL: [Self; 9] = [
        Self::ResponseTime,
        Self::CostEfficiency,
        Self::ContentQuality,
        Self::FactualConsistency,
        Self::TickerAccuracy,
        Self::PriceRange,
        Self::NewsRelevance,
        Self::GracefulFailure,
        Self::SectorRelevance,
    ];

    /// Stable snake_case name used in CSV headers and JSON keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResponseTime => "response_time",
            Self::CostEfficiency => "cost_efficiency",
            Self::ContentQuality => "content_quality",
            Self::FactualConsistency => "factual_consistency",
            Self::TickerAccuracy => "ticker_accuracy",
            Self::PriceRange => "price_range",
            Self::NewsRelevance => "news_relevance",
            Self::GracefulFailure => "graceful_failure",
            Self::SectorRelevance => "sector_relevance",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single check
///
/// Every check fills the same base record; anything check-specific goes
/// into `fields`, which serializes inline next to the base keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub test: CheckKind,
    pub passed: bool,
    pub score: f64,
    pub details: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl CheckResult {
    pub fn new(test: CheckKind, passed: bool, score: f64, details: impl Into<String>) -> Self {
        Self {
            test,
            passed,
            score: score.clamp(0.0, 1.0),
            details: details.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Arithmetic mean of the check scores, 0.0 for no checks
pub fn overall_score(results: &[CheckResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
}

/// A run whose report was generated and scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRun {
    pub report: String,
    pub evaluations: Vec<CheckResult>,
    pub overall_score: f64,
    /// Seconds from generation request to completion
    pub response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunOutcome {
    Completed(CompletedRun),
    Failed { error: String },
}

/// One evaluation of one company input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRun {
    pub company: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

impl EvaluationRun {
    pub fn completed(
        company: impl Into<String>,
        report: impl Into<String>,
        evaluations: Vec<CheckResult>,
        response_time: f64,
    ) -> Self {
        let overall_score = overall_score(&evaluations);
        Self {
            company: company.into(),
            timestamp: Utc::now(),
            outcome: RunOutcome::Completed(CompletedRun {
                report: report.into(),
                evaluations,
                overall_score,
                response_time,
            }),
        }
    }

    pub fn failed(company: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            timestamp: Utc::now(),
            outcome: RunOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed(_))
    }

    pub fn completed_run(&self) -> Option<&CompletedRun> {
        match &self.outcome {
            RunOutcome::Completed(run) => Some(run),
            RunOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            RunOutcome::Failed { error } => Some(error),
            RunOutcome::Completed(_) => None,
        }
    }

    /// Check results in invocation order; empty for failed runs
    pub fn evaluations(&self) -> &[CheckResult] {
        self.completed_run()
            .map(|run| run.evaluations.as_slice())
            .unwrap_or_default()
    }

    /// Mean check score; 0.0 for failed runs
    pub fn overall_score(&self) -> f64 {
        self.completed_run().map_or(0.0, |run| run.overall_score)
    }

    /// Generation latency in seconds; 0.0 for failed runs
    pub fn response_time(&self) -> f64 {
        self.completed_run().map_or(0.0, |run| run.response_time)
    }

    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.evaluations().iter().find(|r| r.test == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(kind: CheckKind, score: f64) -> CheckResult {
        CheckResult::new(kind, score >= 0.5, score, "")
    }

    #[test]
    fn test_check_kind_names() {
        assert_eq!(CheckKind::FactualConsistency.to_string(), "factual_consistency");
        for kind in CheckKind::ALL {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }

    #[test]
    fn test_overall_score() {
        let results = vec![
            result(CheckKind::GracefulFailure, 1.0),
            result(CheckKind::NewsRelevance, 0.8),
            result(CheckKind::PriceRange, 0.6),
        ];
        assert!((overall_score(&results) - 0.8).abs() < 1e-9);
        assert_eq!(overall_score(&[]), 0.0);
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(CheckResult::new(CheckKind::NewsRelevance, true, 1.7, "").score, 1.0);
        assert_eq!(CheckResult::new(CheckKind::NewsRelevance, false, -0.1, "").score, 0.0);
    }

    #[test]
    fn test_check_result_serializes_fields_inline() {
        let check = CheckResult::new(CheckKind::FactualConsistency, false, 0.0, "No stock price found in report")
            .with_field("expected", 150.0)
            .with_field("found", Value::Null);

        let value = serde_json::to_value(&check).unwrap();
        assert_eq!(
            value,
            json!({
                "test": "factual_consistency",
                "passed": false,
                "score": 0.0,
                "details": "No stock price found in report",
                "expected": 150.0,
                "found": null
            })
        );
    }

    #[test]
    fn test_completed_run() {
        let run = EvaluationRun::completed(
            "Apple",
            "report",
            vec![result(CheckKind::GracefulFailure, 1.0), result(CheckKind::NewsRelevance, 0.5)],
            12.5,
        );
        assert!(run.is_success());
        assert_eq!(run.overall_score(), 0.75);
        assert_eq!(run.response_time(), 12.5);
        assert!(run.check(CheckKind::NewsRelevance).is_some());
        assert!(run.check(CheckKind::PriceRange).is_none());
        assert_eq!(run.error(), None);
    }

    #[test]
    fn test_failed_run_serialization() {
        let run = EvaluationRun::failed("Tesla", "Report generation failed: rate limit");
        assert!(!run.is_success());
        assert!(run.evaluations().is_empty());
        assert_eq!(run.overall_score(), 0.0);

        let value = serde_json::to_value(&run).unwrap();
        assert_eq!(value["company"], "Tesla");
        assert_eq!(value["error"], "Report generation failed: rate limit");
        assert!(value.get("timestamp").is_some());
        assert!(value.get("evaluations").is_none());
    }
}
