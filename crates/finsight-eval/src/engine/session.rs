//! Ownership of evaluation runs for the lifetime of a batch

use super::Evaluator;
use crate::case::EvalRequest;
use crate::config::EvalConfig;
use crate::error::Result;
use crate::report::{BatchReport, generate_evaluation_report, save_results};
use crate::result::EvaluationRun;
use std::collections::VecDeque;
use std::path::Path;
use tracing::debug;

/// Runs recorded during one batch, oldest first
///
/// Runs are never modified once recorded. With a `max_runs` bound the oldest
/// run is dropped to make room for a new one.
#[derive(Debug, Clone, Default)]
pub struct EvaluationSession {
    runs: VecDeque<EvaluationRun>,
    max_runs: Option<usize>,
}

impl EvaluationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that keeps at most `max_runs` runs
    pub fn bounded(max_runs: usize) -> Self {
        Self {
            runs: VecDeque::new(),
            max_runs: Some(max_runs.max(1)),
        }
    }

    pub fn from_config(config: &EvalConfig) -> Self {
        config.max_runs.map_or_else(Self::new, Self::bounded)
    }

    /// Evaluate one request and record the run
    pub async fn run_evaluation(&mut self, evaluator: &Evaluator, request: &EvalRequest) -> &EvaluationRun {
        let run = evaluator.evaluate(request).await;
        self.record(run)
    }

    /// Append a run, evicting the oldest if the session is full
    pub fn record(&mut self, run: EvaluationRun) -> &EvaluationRun {
        if let Some(max) = self.max_runs {
            while self.runs.len() >= max {
                if let Some(evicted) = self.runs.pop_front() {
                    debug!(company = %evicted.company, "Evicted oldest run");
                }
            }
        }
        self.runs.push_back(run);
        &self.runs[self.runs.len() - 1]
    }

    pub fn runs(&self) -> impl Iterator<Item = &EvaluationRun> + Clone {
        self.runs.iter()
    }

    pub fn successful(&self) -> impl Iterator<Item = &EvaluationRun> {
        self.runs.iter().filter(|r| r.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &EvaluationRun> {
        self.runs.iter().filter(|r| !r.is_success())
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn max_runs(&self) -> Option<usize> {
        self.max_runs
    }

    /// Drop every recorded run
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Write one CSV row per run; returns the number of rows written
    pub fn save_results(&self, path: impl AsRef<Path>) -> Result<usize> {
        save_results(path, self.runs())
    }

    /// Summarise the recorded runs
    pub fn report(&self) -> BatchReport {
        generate_evaluation_report(self.runs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluator::tests::{CannedGenerator, FULL_REPORT, build_evaluator};
    use std::sync::Arc;

    #[test]
    fn test_bounded_session_evicts_oldest() {
        let mut session = EvaluationSession::bounded(2);
        session.record(EvaluationRun::failed("A", "x"));
        session.record(EvaluationRun::failed("B", "x"));
        let latest = session.record(EvaluationRun::failed("C", "x"));
        assert_eq!(latest.company, "C");

        let companies: Vec<_> = session.runs().map(|r| r.company.as_str()).collect();
        assert_eq!(companies, ["B", "C"]);
    }

    #[test]
    fn test_clear() {
        let mut session = EvaluationSession::new();
        session.record(EvaluationRun::failed("A", "x"));
        assert_eq!(session.len(), 1);
        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = EvalConfig::builder().max_runs(5).build().unwrap();
        assert_eq!(EvaluationSession::from_config(&config).max_runs(), Some(5));
        assert_eq!(EvaluationSession::from_config(&EvalConfig::default()).max_runs(), None);
    }

    #[tokio::test]
    async fn test_run_evaluation_records() {
        let ok = build_evaluator(Arc::new(CannedGenerator::ok(FULL_REPORT)), EvalConfig::default());
        let failing = build_evaluator(Arc::new(CannedGenerator::failing("boom")), EvalConfig::default());

        let mut session = EvaluationSession::new();
        let run = session.run_evaluation(&ok, &EvalRequest::new("Apple")).await;
        assert!(run.is_success());
        session.run_evaluation(&failing, &EvalRequest::new("Tesla")).await;

        assert_eq!(session.len(), 2);
        assert_eq!(session.successful().count(), 1);
        assert_eq!(session.failed().next().map(|r| r.company.as_str()), Some("Tesla"));
    }
}
