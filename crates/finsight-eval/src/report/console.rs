//! Terminal tables for single runs and batch summaries

use super::summary::BatchReport;
use crate::result::EvaluationRun;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn verdict(passed: bool) -> Cell {
    if passed {
        Cell::new("PASS").fg(Color::Green)
    } else {
        Cell::new("FAIL").fg(Color::Red)
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// One row per check, in the order the checks ran
pub fn render_run(run: &EvaluationRun) -> Table {
    let mut table = new_table();

    if let Some(error) = run.error() {
        table.set_header(vec!["Company", "Status", "Error"]);
        table.add_row(vec![
            Cell::new(&run.company),
            Cell::new("FAILED").fg(Color::Red),
            Cell::new(error),
        ]);
        return table;
    }

    table.set_header(vec!["Check", "Result", "Score", "Details"]);
    for result in run.evaluations() {
        table.add_row(vec![
            Cell::new(result.test),
            verdict(result.passed),
            Cell::new(format!("{:.2}", result.score)),
            Cell::new(&result.details),
        ]);
    }
    table.add_row(vec![
        Cell::new(format!("{} overall", run.company)),
        Cell::new(""),
        Cell::new(format!("{:.2}", run.overall_score())),
        Cell::new(format!("response time {:.2}s", run.response_time())),
    ]);
    table
}

/// Counts and performance block followed by the per-check breakdown
pub fn render_summary(report: &BatchReport) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);

    let summary = &report.summary;
    table.add_row(vec!["Total runs".to_string(), summary.total.to_string()]);
    table.add_row(vec!["Successful".to_string(), summary.successful.to_string()]);
    table.add_row(vec!["Failed".to_string(), summary.failed.to_string()]);
    table.add_row(vec!["Success rate".to_string(), percent(summary.success_rate)]);

    let perf = &report.performance_metrics;
    if let Some(score) = perf.avg_score {
        table.add_row(vec!["Average score".to_string(), format!("{score:.3}")]);
    }
    if let Some(secs) = perf.avg_response_time {
        table.add_row(vec!["Average response time".to_string(), format!("{secs:.2}s")]);
    }
    if let Some(best) = &perf.best_performer {
        table.add_row(vec!["Best performer".to_string(), best.clone()]);
    }
    if let Some(worst) = &perf.worst_performer {
        table.add_row(vec!["Worst performer".to_string(), worst.clone()]);
    }

    for (name, breakdown) in &report.test_breakdown {
        table.add_row(vec![
            name.clone(),
            format!(
                "avg {:.3}, pass {} of {} runs",
                breakdown.average_score,
                percent(breakdown.pass_rate),
                breakdown.total_tests
            ),
        ]);
    }

    for insight in &report.insights {
        table.add_row(vec![
            Cell::new("Insight").fg(Color::Yellow),
            Cell::new(insight),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::generate_evaluation_report;
    use crate::result::{CheckKind, CheckResult};

    fn sample_run() -> EvaluationRun {
        EvaluationRun::completed(
            "Apple",
            "report",
            vec![
                CheckResult::new(CheckKind::TickerAccuracy, true, 1.0, "Expected: AAPL, Found: AAPL"),
                CheckResult::new(CheckKind::NewsRelevance, false, 0.2, "Found 1/10 news keywords"),
            ],
            12.5,
        )
    }

    #[test]
    fn test_render_run() {
        let rendered = render_run(&sample_run()).to_string();
        assert!(rendered.contains("ticker_accuracy"));
        assert!(rendered.contains("PASS"));
        assert!(rendered.contains("FAIL"));
        assert!(rendered.contains("Expected: AAPL, Found: AAPL"));
        assert!(rendered.contains("Apple overall"));
        assert!(rendered.contains("0.60"));
    }

    #[test]
    fn test_render_failed_run() {
        let rendered = render_run(&EvaluationRun::failed("Tesla", "job timed out")).to_string();
        assert!(rendered.contains("FAILED"));
        assert!(rendered.contains("job timed out"));
    }

    #[test]
    fn test_render_summary() {
        let runs = [sample_run(), EvaluationRun::failed("Tesla", "boom")];
        let rendered = render_summary(&generate_evaluation_report(&runs)).to_string();
        assert!(rendered.contains("Success rate"));
        assert!(rendered.contains("50.0%"));
        assert!(rendered.contains("Best performer"));
        assert!(rendered.contains("news_relevance"));
    }

    #[test]
    fn test_render_empty_summary() {
        let runs: Vec<EvaluationRun> = Vec::new();
        let rendered = render_summary(&generate_evaluation_report(&runs)).to_string();
        assert!(rendered.contains("Total runs"));
        assert!(!rendered.contains("Best performer"));
    }
}
