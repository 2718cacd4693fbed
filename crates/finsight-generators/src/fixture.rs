//! Generator that replays pre-generated reports from disk
//!
//! Useful for re-scoring a set of reports offline after changing the checks,
//! without paying for generation again.

use crate::{GeneratorError, Result};
use async_trait::async_trait;
use finsight_core::{GeneratedReport, ReportGenerator, ReportRequest};
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Reads `<slug>.md` or `<slug>.txt` from a directory
#[derive(Debug, Clone)]
pub struct FixtureGenerator {
    dir: PathBuf,
}

impl FixtureGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Turn a company input into a file stem: "Apple Inc." -> "apple-inc"
    pub fn slug(company: &str) -> String {
        company
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-")
    }

    async fn load(&self, company: &str) -> Result<GeneratedReport> {
        let slug = Self::slug(company);
        if !slug.is_empty() {
            for ext in EXTENSIONS {
                let path = self.dir.join(format!("{slug}.{ext}"));
                if tokio::fs::try_exists(&path).await? {
                    debug!(path = %path.display(), "Loading fixture report");
                    let text = tokio::fs::read_to_string(&path).await?;
                    return Ok(GeneratedReport::new(text));
                }
            }
        }

        Err(GeneratorError::FixtureNotFound {
            company: company.to_string(),
            dir: self.dir.display().to_string(),
        })
    }
}

#[async_trait]
impl ReportGenerator for FixtureGenerator {
    async fn generate(&self, request: &ReportRequest) -> finsight_core::Result<GeneratedReport> {
        Ok(self.load(&request.company_input).await?)
    }

    fn name(&self) -> &str {
        "fixtures"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(FixtureGenerator::slug("Apple Inc."), "apple-inc");
        assert_eq!(FixtureGenerator::slug("  JPMorgan  Chase & Co "), "jpmorgan-chase-co");
        assert_eq!(FixtureGenerator::slug("AAPL"), "aapl");
        assert_eq!(FixtureGenerator::slug("!!!"), "");
    }

    #[tokio::test]
    async fn test_prefers_markdown_then_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("apple.txt"), "plain report").unwrap();
        std::fs::write(dir.path().join("tesla-inc.md"), "# Tesla").unwrap();
        std::fs::write(dir.path().join("tesla-inc.txt"), "ignored").unwrap();

        let generator = FixtureGenerator::new(dir.path());

        let report = generator.generate(&ReportRequest::new("Apple")).await.unwrap();
        assert_eq!(report.text, "plain report");

        let report = generator.generate(&ReportRequest::new("Tesla, Inc.")).await.unwrap();
        assert_eq!(report.text, "# Tesla");
    }

    #[tokio::test]
    async fn test_missing_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let generator = FixtureGenerator::new(dir.path());

        let err = generator.load("Nvidia").await.unwrap_err();
        assert!(matches!(err, GeneratorError::FixtureNotFound { ref company, .. } if company == "Nvidia"));

        let err = generator.generate(&ReportRequest::new("Nvidia")).await.unwrap_err();
        assert!(err.to_string().contains("No fixture report for 'Nvidia'"));
    }
}
