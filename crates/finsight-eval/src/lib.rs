//! Evaluation engine for generated financial reports
//!
//! A report generator (see [`finsight_core::ReportGenerator`]) produces a
//! free-text company report; this crate scores it against reference values:
//!
//! - Metric primitives: response time, cost efficiency, content quality
//! - Extractors: stock price and ticker pulled out of report text
//! - Checks: factual consistency, ticker accuracy, 52-week range, news
//!   relevance, graceful failure, sector relevance
//! - Orchestration: [`Evaluator`] runs one generation and the applicable
//!   checks, [`EvaluationSession`] keeps the runs of a batch
//! - Reporting: CSV export, JSON batch summary, terminal tables
//!
//! # Example
//!
//! ```rust,ignore
//! use finsight_eval::{EvalConfig, EvalRequest, EvaluationSession, Evaluator};
//! use finsight_generators::FixtureGenerator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let generator = Arc::new(FixtureGenerator::new("reports/"));
//!     let evaluator = Evaluator::new(generator, EvalConfig::default())?;
//!
//!     let mut session = EvaluationSession::new();
//!     let request = EvalRequest::new("Apple Inc.")
//!         .with_expected_ticker("AAPL")
//!         .with_price_range(164.08, 199.62);
//!     let run = session.run_evaluation(&evaluator, &request).await;
//!     println!("{}", run.overall_score());
//!
//!     session.save_results("results.csv")?;
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod case;
pub mod checks;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod report;
pub mod result;
pub mod text;
pub mod tokens;

pub use analyzer::{FullAnalyzer, HeuristicAnalyzer, Lexicon, TextAnalyzer, TextScores};
pub use case::{EvalCase, EvalRequest, load_eval_set};
pub use config::{AnalyzerKind, CostRate, EvalConfig, EvalConfigBuilder};
pub use engine::{EvaluationSession, Evaluator, run_batch};
pub use error::{EvalError, Result};
pub use extract::{extract_stock_price, extract_ticker};
pub use report::{BatchReport, generate_evaluation_report, render_run, render_summary, save_results};
pub use result::{CheckKind, CheckResult, EvaluationRun, RunOutcome};
pub use tokens::{Cl100kTokenCounter, TokenCounter, TokenSource};
