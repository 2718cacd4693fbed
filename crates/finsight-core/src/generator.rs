//! Core ReportGenerator trait definition

use crate::{GeneratedReport, ReportRequest, Result};
use async_trait::async_trait;

/// Anything that can turn a company identifier into a research report
///
/// Implementations may call out to an LLM, a job queue, or read pre-generated
/// reports from disk. Any returned error is treated by the evaluation harness
/// as a failure of the whole run; there is no partial credit.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Produce a report for the request
    async fn generate(&self, request: &ReportRequest) -> Result<GeneratedReport>;

    /// Get the generator's name
    fn name(&self) -> &str;
}
