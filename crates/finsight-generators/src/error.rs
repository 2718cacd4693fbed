//! Error types for report generators

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur while producing a report
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The remote job finished with an error
    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    /// The remote job did not finish in time
    #[error("Job {job_id} did not complete within {waited_secs}s")]
    JobTimeout { job_id: String, waited_secs: u64 },

    /// No pre-generated report exists for the company
    #[error("No fixture report for '{company}' in {dir}")]
    FixtureNotFound { company: String, dir: String },

    /// Reading a fixture failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<GeneratorError> for finsight_core::Error {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::JobTimeout { waited_secs, .. } => Self::Timeout(waited_secs),
            GeneratorError::Configuration(msg) => Self::InitializationFailed(msg),
            GeneratorError::InvalidUrl(e) => Self::InitializationFailed(e.to_string()),
            other => Self::GenerationFailed(other.to_string()),
        }
    }
}
