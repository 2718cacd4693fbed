//! OpenAI-compatible report generator
//!
//! Produces a report with a single chat-completion call. Works against the
//! OpenAI API or anything that speaks the same protocol (vLLM, llama.cpp,
//! LM Studio, Azure deployments).
//!
//! ```no_run
//! use finsight_core::{ReportGenerator, ReportRequest};
//! use finsight_generators::{OpenAiConfig, OpenAiReportGenerator};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OpenAiConfig::new("sk-...").with_model("gpt-4").with_timeout(180);
//! let generator = OpenAiReportGenerator::with_config(config)?;
//!
//! let report = generator
//!     .generate(&ReportRequest::new("Apple").with_sector("Technology"))
//!     .await?;
//! println!("{}", report.text);
//! # Ok(())
//! # }
//! ```

use crate::{GeneratorError, Result};
use async_trait::async_trait;
use finsight_core::{GeneratedReport, ReportGenerator, ReportRequest, TokenUsage};
use finsight_utils::env_var;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_TOKENS: usize = 2048;

const SYSTEM_PROMPT: &str = "You are a senior equity research analyst. Write a professional \
financial research report structured with these sections: Executive Summary, Current Financial \
Position (stock price, market capitalization, P/E ratio, dividend yield, volume), Recent \
Developments & Market Sentiment (news analysis), Key Insights & Analysis, Risk Factors and \
Investment Outlook. Report exact numbers, write in active voice and keep sentences short. If \
data is unavailable, say so explicitly instead of guessing.";

/// Configuration for the OpenAI report generator
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: "https://api.openai.com/v1")
    pub api_base: String,

    /// Model used to write the report (default: "gpt-4")
    pub model: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,

    /// Completion budget (default: 2048)
    pub max_tokens: usize,

    /// Sampling temperature, provider default when unset
    pub temperature: Option<f32>,
}

impl OpenAiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `OPENAI_API_KEY`. `OPENAI_API_BASE` and
    /// `OPENAI_MODEL` are honoured when set.
    pub fn from_env() -> Result<Self> {
        let api_key = env_var("OPENAI_API_KEY").ok_or_else(|| {
            GeneratorError::Configuration("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        let mut config = Self::new(api_key);
        if let Some(api_base) = env_var("OPENAI_API_BASE") {
            config.api_base = api_base;
        }
        if let Some(model) = env_var("OPENAI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the completion budget
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }
}

/// Report generator backed by a single chat completion
pub struct OpenAiReportGenerator {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiReportGenerator {
    /// Create a generator with custom configuration
    pub fn with_config(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GeneratorError::Configuration("API key must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a generator with an API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAiConfig::new(api_key))
    }

    /// Create a generator from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(OpenAiConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn build_messages(request: &ReportRequest) -> Vec<ChatMessage> {
        let mut prompt = format!(
            "Write a financial research report for: {}.",
            request.company_input
        );
        if let Some(sector) = &request.sector {
            prompt.push_str(&format!(
                " The company operates in the {sector} sector; include sector-specific context and trends."
            ));
        }

        vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ]
    }

    #[instrument(skip(self, request), fields(company = %request.company_input, model = %self.config.model))]
    async fn complete(&self, request: &ReportRequest) -> Result<GeneratedReport> {
        debug!("Sending report request to {}", self.config.api_base);

        let body = ChatRequest {
            model: &self.config.model,
            messages: Self::build_messages(request),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.api_base.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 => GeneratorError::AuthenticationFailed,
                429 => GeneratorError::RateLimitExceeded(error_text),
                404 => GeneratorError::ModelNotFound(self.config.model.clone()),
                _ => GeneratorError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            GeneratorError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            GeneratorError::UnexpectedResponse("No choices in response".to_string())
        })?;

        let text = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GeneratorError::UnexpectedResponse("Empty report content".to_string()))?;

        let mut report = GeneratedReport::new(text);
        if let Some(usage) = parsed.usage {
            debug!(
                "Report generated - finish_reason: {}, tokens: {}/{}",
                choice.finish_reason.as_deref().unwrap_or("unknown"),
                usage.prompt_tokens,
                usage.completion_tokens
            );
            report = report.with_usage(TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            });
        }

        Ok(report)
    }
}

#[async_trait]
impl ReportGenerator for OpenAiReportGenerator {
    async fn generate(&self, request: &ReportRequest) -> finsight_core::Result<GeneratedReport> {
        Ok(self.complete(request).await?)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}
