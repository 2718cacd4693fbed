//! Configuration file loading utilities
//!
//! Config files may be TOML (`.toml`) or JSON (`.json`). Before parsing, any
//! `${VAR}` reference in the file is replaced with the value of the matching
//! environment variable, so secrets can stay out of checked-in files.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

static ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env pattern"));

/// Errors raised while loading configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one we know how to parse
    #[error("Unsupported config format for {0} (expected .toml or .json)")]
    UnsupportedFormat(String),

    /// TOML parse failure
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse failure
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A `${VAR}` reference names a variable that is not set
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
}

/// Load and deserialize a TOML or JSON config file
///
/// # Example
///
/// ```no_run
/// # use serde::Deserialize;
/// #[derive(Deserialize)]
/// struct Settings { model: String }
///
/// let settings: Settings = finsight_utils::load_config_file("finsight.toml")?;
/// # Ok::<(), finsight_utils::ConfigError>(())
/// ```
pub fn load_config_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let content = expand_env_vars(&raw)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(toml::from_str(&content)?),
        Some("json") => Ok(serde_json::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Replace `${VAR}` references with environment variable values
pub fn expand_env_vars(s: &str) -> Result<String, ConfigError> {
    let mut result = s.to_string();

    for cap in ENV_REF.captures_iter(s) {
        let var_name = &cap[1];
        let value =
            std::env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
        result = result.replace(&cap[0], &value);
    }

    Ok(result)
}

/// Read an environment variable, treating empty values as unset
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
