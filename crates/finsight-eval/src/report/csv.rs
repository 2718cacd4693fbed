//! Tabular results export
//!
//! Columns are `company, overall_score, response_time, timestamp`, followed
//! by `{check}_score`, `{check}_passed` and `{check}_details` groups for the
//! union of checks seen in any run, each group sorted by check name.

use crate::error::Result;
use crate::result::EvaluationRun;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Write the runs to a CSV file; an empty set of runs writes nothing
pub fn save_results<'a, I>(path: impl AsRef<Path>, runs: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a EvaluationRun>,
    I::IntoIter: Clone,
{
    let path = path.as_ref();
    let mut runs = runs.into_iter().peekable();
    if runs.peek().is_none() {
        warn!("No evaluation results to save");
        return Ok(0);
    }

    let file = std::fs::File::create(path)?;
    let rows = write_results(file, runs)?;
    info!(path = %path.display(), rows, "Results saved");
    Ok(rows)
}

/// Write the runs as CSV to any writer; returns the number of data rows
pub fn write_results<'a, W, I>(writer: W, runs: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a EvaluationRun>,
    I::IntoIter: Clone,
{
    let runs = runs.into_iter();

    let check_names: BTreeSet<&'static str> = runs
        .clone()
        .flat_map(|run| run.evaluations().iter().map(|r| r.test.as_str()))
        .collect();

    let mut header = vec![
        "company".to_string(),
        "overall_score".to_string(),
        "response_time".to_string(),
        "timestamp".to_string(),
    ];
    for suffix in ["score", "passed", "details"] {
        header.extend(check_names.iter().map(|name| format!("{name}_{suffix}")));
    }

    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(&header)?;

    let mut rows = 0;
    for run in runs {
        let mut record = vec![
            run.company.clone(),
            run.overall_score().to_string(),
            run.response_time().to_string(),
            run.timestamp.to_rfc3339(),
        ];

        let lookup = |name: &str| run.evaluations().iter().find(|r| r.test.as_str() == name);
        record.extend(check_names.iter().map(|&name| {
            lookup(name).map_or_else(|| 0.0_f64.to_string(), |r| r.score.to_string())
        }));
        record.extend(
            check_names
                .iter()
                .map(|&name| lookup(name).is_some_and(|r| r.passed).to_string()),
        );
        record.extend(
            check_names
                .iter()
                .map(|&name| lookup(name).map(|r| r.details.clone()).unwrap_or_default()),
        );

        csv.write_record(&record)?;
        rows += 1;
    }

    csv.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{CheckKind, CheckResult};

    fn read_back(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = ::csv::Reader::from_reader(bytes);
        let header = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (header, rows)
    }

    #[test]
    fn test_column_union_with_defaults() {
        let first = EvaluationRun::completed(
            "Apple",
            "report",
            vec![
                CheckResult::new(CheckKind::NewsRelevance, true, 0.5, "Found 3 keywords"),
                CheckResult::new(CheckKind::GracefulFailure, true, 1.0, "No errors"),
            ],
            12.0,
        );
        let second = EvaluationRun::completed(
            "Tesla",
            "report",
            vec![CheckResult::new(CheckKind::PriceRange, false, 0.0, "outside")],
            30.0,
        );
        let failed = EvaluationRun::failed("Nvidia", "timeout");

        let mut buf = Vec::new();
        let rows = write_results(&mut buf, [&first, &second, &failed]).unwrap();
        assert_eq!(rows, 3);

        let (header, records) = read_back(&buf);
        assert_eq!(
            header,
            [
                "company",
                "overall_score",
                "response_time",
                "timestamp",
                "graceful_failure_score",
                "news_relevance_score",
                "price_range_score",
                "graceful_failure_passed",
                "news_relevance_passed",
                "price_range_passed",
                "graceful_failure_details",
                "news_relevance_details",
                "price_range_details",
            ]
        );

        assert_eq!(records[0][0], "Apple");
        assert_eq!(records[0][1], "0.75");
        assert_eq!(records[0][2], "12");
        assert_eq!(&records[0][4..7], ["1", "0.5", "0"]);
        assert_eq!(&records[0][7..10], ["true", "true", "false"]);
        assert_eq!(&records[0][10..13], ["No errors", "Found 3 keywords", ""]);

        assert_eq!(&records[1][4..7], ["0", "0", "0"]);
        assert_eq!(records[1][9], "false");
        assert_eq!(records[1][12], "outside");

        // Failed runs keep identity columns and zeroed scores
        assert_eq!(records[2][0], "Nvidia");
        assert_eq!(records[2][1], "0");
        assert_eq!(records[2][2], "0");
        assert!(!records[2][3].is_empty());
        assert_eq!(&records[2][7..10], ["false", "false", "false"]);
    }

    #[test]
    fn test_empty_session_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let rows = save_results(&path, std::iter::empty::<&EvaluationRun>()).unwrap();
        assert_eq!(rows, 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_save_results_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let runs = vec![EvaluationRun::failed("Apple", "boom")];

        let rows = save_results(&path, &runs).unwrap();
        assert_eq!(rows, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("company,overall_score,response_time,timestamp\n"));
        assert!(content.contains("Apple,0,0,"));
    }
}
