//! Single-run orchestration: generate, score, aggregate

use crate::analyzer::{FullAnalyzer, HeuristicAnalyzer, TextAnalyzer};
use crate::case::EvalRequest;
use crate::checks::{
    check_factual_consistency, check_graceful_failure, check_news_relevance, check_price_range,
    check_sector_relevance, check_ticker_accuracy,
};
use crate::config::{AnalyzerKind, EvalConfig};
use crate::error::Result;
use crate::metrics::{evaluate_content_quality, grade_cost, measure_cost_efficiency, measure_response_time};
use crate::result::{CheckResult, EvaluationRun};
use crate::tokens::{Cl100kTokenCounter, TokenCounter, TokenSource};
use finsight_core::{GeneratedReport, ReportGenerator};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Runs the report generator and the applicable checks
pub struct Evaluator {
    generator: Arc<dyn ReportGenerator>,
    config: EvalConfig,
    analyzer: Arc<dyn TextAnalyzer>,
    token_counter: Arc<dyn TokenCounter>,
}

impl Evaluator {
    /// Create an evaluator, picking the text analyzer from config
    ///
    /// If the configured lexicon cannot be loaded the evaluator falls back to
    /// the heuristic analyzer instead of failing.
    pub fn new(generator: Arc<dyn ReportGenerator>, config: EvalConfig) -> Result<Self> {
        config.validate()?;

        let analyzer: Arc<dyn TextAnalyzer> = match config.analyzer {
            AnalyzerKind::Heuristic => Arc::new(HeuristicAnalyzer),
            AnalyzerKind::Full => match FullAnalyzer::from_config(&config) {
                Ok(analyzer) => Arc::new(analyzer),
                Err(e) => {
                    warn!(error = %e, "Full text analysis unavailable, using heuristic analyzer");
                    Arc::new(HeuristicAnalyzer)
                }
            },
        };

        Ok(Self {
            generator,
            config,
            analyzer,
            token_counter: Arc::new(Cl100kTokenCounter::new()?),
        })
    }

    /// Replace the text analyzer
    pub fn with_analyzer(mut self, analyzer: Arc<dyn TextAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Replace the token counter used for cost estimates
    pub fn with_token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.token_counter = counter;
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Generate a report for the request and score it
    ///
    /// Generation failures become a failed run; nothing is retried.
    #[instrument(skip(self, request), fields(company = %request.company_input, generator = %self.generator.name()))]
    pub async fn evaluate(&self, request: &EvalRequest) -> EvaluationRun {
        let start = Instant::now();

        match self.generator.generate(&request.to_report_request()).await {
            Ok(report) => {
                let end = Instant::now();
                let response_time = end.saturating_duration_since(start).as_secs_f64();
                let evaluations = self.score_report(request, &report, start, end);
                let run = EvaluationRun::completed(
                    &request.company_input,
                    report.text,
                    evaluations,
                    response_time,
                );
                info!(
                    overall_score = run.overall_score(),
                    response_time,
                    checks = run.evaluations().len(),
                    "Evaluation completed"
                );
                run
            }
            Err(e) => {
                warn!(error = %e, "Report generation failed");
                EvaluationRun::failed(&request.company_input, e.to_string())
            }
        }
    }

    /// Run every applicable check against an already generated report
    ///
    /// Order: graceful failure, news relevance, then (enhanced mode) response
    /// time, cost efficiency and content quality, then the checks enabled by
    /// the request's reference values.
    pub fn score_report(
        &self,
        request: &EvalRequest,
        report: &GeneratedReport,
        start: Instant,
        end: Instant,
    ) -> Vec<CheckResult> {
        let text = report.text.as_str();
        let mut results = vec![check_graceful_failure(text), check_news_relevance(text)];

        if self.config.enhanced_mode {
            results.push(measure_response_time(start, end));
            results.push(self.cost_check(request, report));
            results.push(evaluate_content_quality(text, self.analyzer.as_ref()));
        }

        if let Some(expected) = request.expected_price {
            results.push(check_factual_consistency(text, expected));
        }
        if let Some(ticker) = &request.expected_ticker {
            results.push(check_ticker_accuracy(text, ticker));
        }
        if let (Some(high), Some(low)) = (request.high, request.low) {
            results.push(check_price_range(text, high, low));
        }
        if let Some(sector) = &request.sector {
            let keywords = self.config.sector_keywords_for(sector);
            results.push(check_sector_relevance(text, sector, keywords));
        }

        for result in &results {
            debug!(
                check = %result.test,
                passed = result.passed,
                score = result.score,
                details = %result.details,
                "Check finished"
            );
        }
        results
    }

    /// Prefer provider-reported usage; otherwise tokenize input and report
    fn cost_check(&self, request: &EvalRequest, report: &GeneratedReport) -> CheckResult {
        match report.usage {
            Some(usage) => grade_cost(
                &self.config.cost_rates,
                usage.input_tokens,
                usage.output_tokens,
                &self.config.model,
                TokenSource::Provider,
            ),
            None => measure_cost_efficiency(
                self.token_counter.as_ref(),
                &self.config.cost_rates,
                &request.company_input,
                &report.text,
                &self.config.model,
            ),
        }
    }
}
