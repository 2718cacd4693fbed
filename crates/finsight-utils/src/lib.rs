//! Shared utilities for finsight
//!
//! This crate provides common functionality used across the finsight workspace,
//! including logging setup and configuration file loading.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_var, expand_env_vars, load_config_file};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
