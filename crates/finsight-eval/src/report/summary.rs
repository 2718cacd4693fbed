//! Batch summary: counts, averages, best and worst performers, insights

use crate::error::Result;
use crate::result::{CheckKind, EvaluationRun};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const SLOW_RESPONSE_SECS: f64 = 60.0;
const COST_TARGET_SCORE: f64 = 0.8;
const QUALITY_TARGET_SCORE: f64 = 0.7;

pub const SLOW_RESPONSE_INSIGHT: &str =
    "Response times are above optimal threshold (60s). Consider optimizing API calls or caching.";
pub const COST_INSIGHT: &str =
    "Cost efficiency is below target. Consider using more efficient models or optimizing prompts.";
pub const QUALITY_INSIGHT: &str =
    "Content quality needs improvement. Consider enhancing prompts or model selection.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCounts {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
}

/// Aggregates over successful runs; every field is absent when none succeeded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_response_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_performer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worst_performer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckBreakdown {
    pub average_score: f64,
    pub pass_rate: f64,
    pub total_tests: usize,
}

/// Read-only summary of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub timestamp: DateTime<Utc>,
    pub summary: RunCounts,
    pub performance_metrics: PerformanceMetrics,
    pub test_breakdown: BTreeMap<String, CheckBreakdown>,
    pub insights: Vec<String>,
}

impl BatchReport {
    pub fn breakdown(&self, kind: CheckKind) -> Option<&CheckBreakdown> {
        self.test_breakdown.get(kind.as_str())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty-printed JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_pretty()?)?;
        info!(path = %path.display(), "Evaluation report saved");
        Ok(())
    }
}

#[derive(Default)]
struct CheckTally {
    score_sum: f64,
    passed: usize,
    total: usize,
}

/// Summarise a set of runs
pub fn generate_evaluation_report<'a>(runs: impl IntoIterator<Item = &'a EvaluationRun>) -> BatchReport {
    let runs: Vec<&EvaluationRun> = runs.into_iter().collect();
    let successful: Vec<&EvaluationRun> = runs.iter().copied().filter(|r| r.is_success()).collect();

    let total = runs.len();
    let summary = RunCounts {
        total,
        successful: successful.len(),
        failed: total - successful.len(),
        success_rate: if total == 0 {
            0.0
        } else {
            successful.len() as f64 / total as f64
        },
    };

    let mut report = BatchReport {
        timestamp: Utc::now(),
        summary,
        performance_metrics: PerformanceMetrics::default(),
        test_breakdown: BTreeMap::new(),
        insights: Vec::new(),
    };

    let Some((&first, rest)) = successful.split_first() else {
        return report;
    };

    let n = successful.len() as f64;
    let avg_score = successful.iter().map(|r| r.overall_score()).sum::<f64>() / n;
    let avg_response_time = successful.iter().map(|r| r.response_time()).sum::<f64>() / n;

    let (mut best, mut worst) = (first, first);
    for &run in rest {
        if run.overall_score() > best.overall_score() {
            best = run;
        }
        if run.overall_score() < worst.overall_score() {
            worst = run;
        }
    }

    report.performance_metrics = PerformanceMetrics {
        avg_score: Some(avg_score),
        avg_response_time: Some(avg_response_time),
        best_performer: Some(best.company.clone()),
        worst_performer: Some(worst.company.clone()),
    };

    let mut tallies: BTreeMap<&'static str, CheckTally> = BTreeMap::new();
    for result in successful.iter().flat_map(|r| r.evaluations()) {
        let tally = tallies.entry(result.test.as_str()).or_default();
        tally.score_sum += result.score;
        tally.passed += usize::from(result.passed);
        tally.total += 1;
    }

    report.test_breakdown = tallies
        .into_iter()
        .map(|(name, t)| {
            (
                name.to_string(),
                CheckBreakdown {
                    average_score: t.score_sum / t.total as f64,
                    pass_rate: t.passed as f64 / t.total as f64,
                    total_tests: t.total,
                },
            )
        })
        .collect();

    if avg_response_time > SLOW_RESPONSE_SECS {
        report.insights.push(SLOW_RESPONSE_INSIGHT.to_string());
    }
    if report
        .breakdown(CheckKind::CostEfficiency)
        .is_some_and(|b| b.average_score < COST_TARGET_SCORE)
    {
        report.insights.push(COST_INSIGHT.to_string());
    }
    if report
        .breakdown(CheckKind::ContentQuality)
        .is_some_and(|b| b.average_score < QUALITY_TARGET_SCORE)
    {
        report.insights.push(QUALITY_INSIGHT.to_string());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::CheckResult;
    use serde_json::json;

    fn run(company: &str, checks: &[(CheckKind, f64, bool)], response_time: f64) -> EvaluationRun {
        let evaluations = checks
            .iter()
            .map(|&(kind, score, passed)| CheckResult::new(kind, passed, score, ""))
            .collect();
        EvaluationRun::completed(company, "report", evaluations, response_time)
    }

    #[test]
    fn test_empty_report() {
        let runs: Vec<EvaluationRun> = Vec::new();
        let report = generate_evaluation_report(&runs);
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.success_rate, 0.0);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["performance_metrics"], json!({}));
        assert_eq!(value["test_breakdown"], json!({}));
        assert_eq!(value["insights"], json!([]));
    }

    #[test]
    fn test_only_failures() {
        let runs = [EvaluationRun::failed("A", "x"), EvaluationRun::failed("B", "y")];
        let report = generate_evaluation_report(&runs);
        assert_eq!(report.summary.failed, 2);
        assert_eq!(report.summary.success_rate, 0.0);
        assert_eq!(report.performance_metrics, PerformanceMetrics::default());
    }

    #[test]
    fn test_aggregates() {
        let runs = [
            run(
                "Apple",
                &[(CheckKind::NewsRelevance, 1.0, true), (CheckKind::CostEfficiency, 1.0, true)],
                20.0,
            ),
            run(
                "Tesla",
                &[(CheckKind::NewsRelevance, 0.2, false), (CheckKind::CostEfficiency, 0.5, false)],
                40.0,
            ),
            EvaluationRun::failed("Nvidia", "timeout"),
        ];

        let report = generate_evaluation_report(&runs);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.successful, 2);
        assert_eq!(report.summary.failed, 1);
        assert!((report.summary.success_rate - 2.0 / 3.0).abs() < 1e-12);

        let perf = &report.performance_metrics;
        assert_eq!(perf.avg_score, Some((1.0 + 0.35) / 2.0));
        assert_eq!(perf.avg_response_time, Some(30.0));
        assert_eq!(perf.best_performer.as_deref(), Some("Apple"));
        assert_eq!(perf.worst_performer.as_deref(), Some("Tesla"));

        let news = report.breakdown(CheckKind::NewsRelevance).unwrap();
        assert!((news.average_score - 0.6).abs() < 1e-12);
        assert_eq!(news.pass_rate, 0.5);
        assert_eq!(news.total_tests, 2);

        // Cost average 0.75 is under target; no quality check ran
        assert_eq!(report.insights, [COST_INSIGHT]);
    }

    #[test]
    fn test_ties_keep_first() {
        let runs = [
            run("First", &[(CheckKind::NewsRelevance, 0.5, true)], 1.0),
            run("Second", &[(CheckKind::NewsRelevance, 0.5, true)], 1.0),
        ];
        let report = generate_evaluation_report(&runs);
        assert_eq!(report.performance_metrics.best_performer.as_deref(), Some("First"));
        assert_eq!(report.performance_metrics.worst_performer.as_deref(), Some("First"));
    }

    #[test]
    fn test_insights() {
        let runs = [run(
            "Slow",
            &[(CheckKind::ContentQuality, 0.6, true), (CheckKind::CostEfficiency, 0.8, true)],
            90.0,
        )];
        let report = generate_evaluation_report(&runs);
        assert_eq!(report.insights, [SLOW_RESPONSE_INSIGHT, QUALITY_INSIGHT]);
    }

    #[test]
    fn test_json_shape_and_save() {
        let runs = [run("Apple", &[(CheckKind::GracefulFailure, 1.0, true)], 5.0)];
        let report = generate_evaluation_report(&runs);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["successful"], 1);
        assert_eq!(value["performance_metrics"]["best_performer"], "Apple");
        assert_eq!(value["test_breakdown"]["graceful_failure"]["total_tests"], 1);
        assert!(value["timestamp"].is_string());
    }
}
