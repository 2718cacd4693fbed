//! Persisting and presenting evaluation results

pub mod console;
pub mod csv;
pub mod summary;

pub use self::csv::{save_results, write_results};
pub use console::{render_run, render_summary};
pub use summary::{BatchReport, CheckBreakdown, PerformanceMetrics, RunCounts, generate_evaluation_report};
