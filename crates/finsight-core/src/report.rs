//! Request and report types exchanged with a generator

use serde::{Deserialize, Serialize};

/// What to generate a report about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Company name or ticker, passed through untouched
    pub company_input: String,

    /// Optional sector context (e.g. "Technology")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl ReportRequest {
    /// Create a request for a company
    pub fn new(company_input: impl Into<String>) -> Self {
        Self {
            company_input: company_input.into(),
            sector: None,
        }
    }

    /// Attach sector context
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }
}

/// Token usage statistics reported by an LLM-backed generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens
    pub input_tokens: usize,

    /// Number of output tokens
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// A finished report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    /// Report text
    pub text: String,

    /// Token usage, when the generator knows it
    pub usage: Option<TokenUsage>,
}

impl GeneratedReport {
    /// Wrap plain report text with no usage information
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Attach provider-reported token usage
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}
