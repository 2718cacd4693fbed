//! Error types for evaluation operations

use thiserror::Error;

/// Evaluation specific errors
///
/// Only input loading, output writing and setup can fail. Check functions
/// never return errors: a missing value or a broken analyzer turns into a
/// failed or degraded `CheckResult` instead.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Reading or writing a file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration or lexicon file could not be loaded
    #[error(transparent)]
    ConfigFile(#[from] finsight_utils::ConfigError),

    /// The subword tokenizer could not be initialised
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// The text analyzer could not process a report
    #[error("Text analysis failed: {0}")]
    Analysis(String),

    /// The report is longer than full analysis is configured to handle
    #[error("size cut-off, report has {len} characters, limit is {max}")]
    TextTooLong { len: usize, max: usize },

    /// Full text analysis is not enabled for this evaluator
    #[error("full text analysis not enabled")]
    AnalysisUnavailable,
}

/// Result type alias for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;
