//! Error types for finsight-core

use thiserror::Error;

/// Result type alias for finsight-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for report generation
#[derive(Error, Debug)]
pub enum Error {
    /// Generator could not be constructed or configured
    #[error("Generator initialization failed: {0}")]
    InitializationFailed(String),

    /// The generator ran but did not produce a report
    #[error("Report generation failed: {0}")]
    GenerationFailed(String),

    /// The generator gave up waiting for a report
    #[error("Report generation timed out after {0}s")]
    Timeout(u64),
}
