//! Report generator backed by the FinSight web job queue
//!
//! The web service runs the full agent pipeline asynchronously. A job is
//! started with `POST /api/analyze`, after which `GET /api/status/{job_id}`
//! is polled until the job completes or fails.

use crate::{GeneratorError, Result};
use async_trait::async_trait;
use finsight_core::{GeneratedReport, ReportGenerator, ReportRequest};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`JobApiGenerator`]
#[derive(Debug, Clone)]
pub struct JobApiConfig {
    /// Base URL of the web service, e.g. `http://localhost:5000`
    pub base_url: String,

    /// Delay between status polls
    pub poll_interval: Duration,

    /// Give up on a job after this long
    pub max_wait: Duration,

    /// Timeout for each individual HTTP request, in seconds
    pub request_timeout_secs: u64,
}

impl JobApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}

/// Generator that submits analysis jobs to the web service and waits for them
pub struct JobApiGenerator {
    client: Client,
    base: Url,
    config: JobApiConfig,
}

impl JobApiGenerator {
    pub fn new(config: JobApiConfig) -> Result<Self> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base,
            config,
        })
    }

    /// Check whether the service reports itself healthy
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn health(&self) -> Result<bool> {
        let response = self.client.get(self.base.join("api/health")?).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }

        let body: Value = response.json().await?;
        Ok(body.get("status").and_then(Value::as_str) == Some("healthy"))
    }

    async fn submit(&self, request: &ReportRequest) -> Result<String> {
        let response = self
            .client
            .post(self.base.join("api/analyze")?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(GeneratorError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        let started: JobStarted = response.json().await.map_err(|e| {
            GeneratorError::UnexpectedResponse(format!("Failed to parse job submission: {e}"))
        })?;
        Ok(started.job_id)
    }

    async fn poll(&self, job_id: &str) -> Result<JobStatus> {
        let url = self.base.join(&format!("api/status/{job_id}"))?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(GeneratorError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        response.json().await.map_err(|e| {
            GeneratorError::UnexpectedResponse(format!("Failed to parse job status: {e}"))
        })
    }

    #[instrument(skip(self, request), fields(company = %request.company_input))]
    async fn run_job(&self, request: &ReportRequest) -> Result<GeneratedReport> {
        let job_id = self.submit(request).await?;
        info!(job_id = %job_id, "Analysis job started");

        let deadline = Instant::now() + self.config.max_wait;
        loop {
            let status = self.poll(&job_id).await?;
            debug!(job_id = %job_id, status = %status.status, "Polled job");

            match status.status.as_str() {
                "completed" => {
                    let text = match status.result {
                        Some(Value::String(s)) => s,
                        Some(Value::Null) | None => {
                            return Err(GeneratorError::UnexpectedResponse(format!(
                                "Job {job_id} completed without a result"
                            )));
                        }
                        Some(other) => other.to_string(),
                    };
                    return Ok(GeneratedReport::new(text));
                }
                "failed" => {
                    let message = status.error.unwrap_or_else(|| "unknown error".to_string());
                    warn!(job_id = %job_id, error = %message, "Analysis job failed");
                    return Err(GeneratorError::JobFailed { job_id, message });
                }
                _ => {}
            }

            if Instant::now() + self.config.poll_interval > deadline {
                return Err(GeneratorError::JobTimeout {
                    job_id,
                    waited_secs: self.config.max_wait.as_secs(),
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

#[async_trait]
impl ReportGenerator for JobApiGenerator {
    async fn generate(&self, request: &ReportRequest) -> finsight_core::Result<GeneratedReport> {
        Ok(self.run_job(request).await?)
    }

    fn name(&self) -> &str {
        "job-api"
    }
}

#[derive(Debug, Deserialize)]
struct JobStarted {
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    status: String,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}
