//! Core abstractions for finsight
//!
//! This crate defines the contract between the evaluation harness and whatever
//! produces financial research reports. The harness treats a generator as an
//! opaque collaborator: it hands over a company identifier (and optionally a
//! sector) and receives a single report string back.

pub mod error;
pub mod generator;
pub mod report;

pub use error::{Error, Result};
pub use generator::ReportGenerator;
pub use report::{GeneratedReport, ReportRequest, TokenUsage};
