//! Report generators for finsight
//!
//! Concrete implementations of [`finsight_core::ReportGenerator`]:
//!
//! - [`JobApiGenerator`]: submits jobs to the FinSight web service and polls
//!   until the agent pipeline finishes
//! - [`OpenAiReportGenerator`]: a single chat completion against any
//!   OpenAI-compatible endpoint
//! - [`FixtureGenerator`]: replays reports saved on disk

pub mod error;
pub mod fixture;
pub mod job_api;
pub mod openai;

pub use error::{GeneratorError, Result};
pub use fixture::FixtureGenerator;
pub use job_api::{JobApiConfig, JobApiGenerator};
pub use openai::{OpenAiConfig, OpenAiReportGenerator};
