//! Configuration for evaluation runs

use crate::error::{EvalError, Result};
use finsight_utils::{env_var, load_config_file};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Per-model token pricing, in dollars per 1K tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRate {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl CostRate {
    pub const fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }

    /// Dollar cost of a request
    pub fn cost(&self, input_tokens: usize, output_tokens: usize) -> f64 {
        (input_tokens as f64 * self.input_per_1k + output_tokens as f64 * self.output_per_1k) / 1000.0
    }
}

/// Which text analyzer backs the content quality check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    /// Lexicon sentiment plus Flesch readability
    #[default]
    Full,
    /// Section completeness and length only
    Heuristic,
}

/// Configuration for the evaluator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Run response time, cost efficiency and content quality checks
    pub enhanced_mode: bool,

    /// Model name used to price token usage
    pub model: String,

    /// Pricing table keyed by model name
    pub cost_rates: BTreeMap<String, CostRate>,

    /// Related keywords per sector, keyed by trimmed lowercase sector name
    #[serde(deserialize_with = "deserialize_sector_keywords")]
    pub sector_keywords: BTreeMap<String, Vec<String>>,

    /// Text analyzer used for content quality
    pub analyzer: AnalyzerKind,

    /// Replace the built-in sentiment lexicon with this JSON or TOML file
    pub lexicon_path: Option<PathBuf>,

    /// Reports longer than this (in characters) skip full text analysis
    pub max_analyzer_chars: usize,

    /// Keep at most this many runs in a session, evicting the oldest
    pub max_runs: Option<usize>,
}

fn default_cost_rates() -> BTreeMap<String, CostRate> {
    BTreeMap::from([
        ("gpt-4".to_string(), CostRate::new(0.03, 0.06)),
        ("gpt-3.5-turbo".to_string(), CostRate::new(0.0015, 0.002)),
    ])
}

/// Table key for a sector name
pub fn sector_key(sector: &str) -> String {
    sector.trim().to_lowercase()
}

fn deserialize_sector_keywords<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let table = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
    Ok(table
        .into_iter()
        .map(|(sector, words)| (sector_key(&sector), words))
        .collect())
}

fn default_sector_keywords() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 5] = [
        ("Technology", &["tech", "software", "hardware", "ai", "cloud", "digital"]),
        ("Healthcare", &["health", "medical", "pharma", "biotech", "clinical"]),
        ("Finance", &["bank", "financial", "insurance", "credit", "lending"]),
        ("Energy", &["oil", "gas", "energy", "renewable", "solar", "wind"]),
        ("Consumer", &["retail", "consumer", "brand", "product", "marketing"]),
    ];

    table
        .into_iter()
        .map(|(sector, words)| {
            (
                sector_key(sector),
                words.iter().map(ToString::to_string).collect(),
            )
        })
        .collect()
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            enhanced_mode: true,
            model: "gpt-4".to_string(),
            cost_rates: default_cost_rates(),
            sector_keywords: default_sector_keywords(),
            analyzer: AnalyzerKind::Full,
            lexicon_path: None,
            max_analyzer_chars: 200_000,
            max_runs: None,
        }
    }
}

impl EvalConfig {
    /// Create a new configuration builder
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::default()
    }

    /// Load a TOML or JSON config file; missing keys take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = load_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FINSIGHT_*` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(model) = env_var("FINSIGHT_MODEL") {
            self.model = model;
        }
        if let Some(flag) = env_var("FINSIGHT_ENHANCED") {
            match parse_flag(&flag) {
                Some(enhanced) => self.enhanced_mode = enhanced,
                None => warn!("Ignoring FINSIGHT_ENHANCED={flag}: expected true or false"),
            }
        }
        if let Some(path) = env_var("FINSIGHT_LEXICON") {
            self.lexicon_path = Some(PathBuf::from(path));
        }
        if let Some(max_runs) = env_var("FINSIGHT_MAX_RUNS") {
            match max_runs.parse() {
                Ok(n) => self.max_runs = Some(n),
                Err(_) => warn!("Ignoring FINSIGHT_MAX_RUNS={max_runs}: not a number"),
            }
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(EvalError::Config("model must not be empty".to_string()));
        }

        for (model, rate) in &self.cost_rates {
            let valid = |v: f64| v.is_finite() && v >= 0.0;
            if !valid(rate.input_per_1k) || !valid(rate.output_per_1k) {
                return Err(EvalError::Config(format!(
                    "cost rates for {model} must be non-negative numbers"
                )));
            }
        }

        if self.sector_keywords.keys().any(|s| s.trim().is_empty()) {
            return Err(EvalError::Config("sector names must not be empty".to_string()));
        }

        if self.max_runs == Some(0) {
            return Err(EvalError::Config("max_runs must be greater than 0".to_string()));
        }

        if self.max_analyzer_chars == 0 {
            return Err(EvalError::Config(
                "max_analyzer_chars must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Pricing for a model, if the table knows it
    pub fn cost_rate(&self, model: &str) -> Option<CostRate> {
        self.cost_rates.get(model).copied()
    }

    /// Related keywords for a sector, matched case-insensitively
    pub fn sector_keywords_for(&self, sector: &str) -> &[String] {
        self.sector_keywords
            .get(&sector_key(sector))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for EvalConfig
#[derive(Debug, Default)]
pub struct EvalConfigBuilder {
    enhanced_mode: Option<bool>,
    model: Option<String>,
    cost_rates: BTreeMap<String, CostRate>,
    sector_keywords: BTreeMap<String, Vec<String>>,
    analyzer: Option<AnalyzerKind>,
    lexicon_path: Option<PathBuf>,
    max_analyzer_chars: Option<usize>,
    max_runs: Option<usize>,
}

impl EvalConfigBuilder {
    /// Enable or disable the enhanced checks
    pub fn enhanced_mode(mut self, enabled: bool) -> Self {
        self.enhanced_mode = Some(enabled);
        self
    }

    /// Set the model used for cost estimation
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add or replace pricing for a model
    pub fn cost_rate(mut self, model: impl Into<String>, rate: CostRate) -> Self {
        self.cost_rates.insert(model.into(), rate);
        self
    }

    /// Add or replace the related keywords for a sector
    pub fn sector<I, S>(mut self, sector: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sector_keywords.insert(
            sector_key(&sector.into()),
            keywords.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Select the text analyzer
    pub fn analyzer(mut self, analyzer: AnalyzerKind) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Load the sentiment lexicon from a file
    pub fn lexicon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon_path = Some(path.into());
        self
    }

    /// Set the character limit for full text analysis
    pub fn max_analyzer_chars(mut self, chars: usize) -> Self {
        self.max_analyzer_chars = Some(chars);
        self
    }

    /// Bound the number of runs a session keeps
    pub fn max_runs(mut self, max_runs: usize) -> Self {
        self.max_runs = Some(max_runs);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EvalConfig> {
        let defaults = EvalConfig::default();

        let mut cost_rates = defaults.cost_rates;
        cost_rates.extend(self.cost_rates);
        let mut sector_keywords = defaults.sector_keywords;
        sector_keywords.extend(self.sector_keywords);

        let config = EvalConfig {
            enhanced_mode: self.enhanced_mode.unwrap_or(defaults.enhanced_mode),
            model: self.model.unwrap_or(defaults.model),
            cost_rates,
            sector_keywords,
            analyzer: self.analyzer.unwrap_or(defaults.analyzer),
            lexicon_path: self.lexicon_path.or(defaults.lexicon_path),
            max_analyzer_chars: self.max_analyzer_chars.unwrap_or(defaults.max_analyzer_chars),
            max_runs: self.max_runs.or(defaults.max_runs),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvalConfig::default();
        assert!(config.enhanced_mode);
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.cost_rate("gpt-4"), Some(CostRate::new(0.03, 0.06)));
        assert_eq!(config.cost_rate("gpt-3.5-turbo"), Some(CostRate::new(0.0015, 0.002)));
        assert_eq!(config.cost_rate("claude-3"), None);
        assert_eq!(config.sector_keywords.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cost_rate_math() {
        let rate = CostRate::new(0.03, 0.06);
        assert!((rate.cost(1000, 1000) - 0.09).abs() < 1e-12);
        assert_eq!(rate.cost(0, 0), 0.0);
    }

    #[test]
    fn test_sector_lookup_is_case_insensitive() {
        let config = EvalConfig::default();
        assert_eq!(config.sector_keywords_for("technology")[0], "tech");
        assert_eq!(config.sector_keywords_for(" ENERGY ").len(), 6);
        assert!(config.sector_keywords_for("Aerospace").is_empty());
    }

    #[test]
    fn test_builder() {
        let config = EvalConfig::builder()
            .enhanced_mode(false)
            .model("gpt-4o")
            .cost_rate("gpt-4o", CostRate::new(0.005, 0.015))
            .sector("Aerospace", ["aircraft", "defense"])
            .analyzer(AnalyzerKind::Heuristic)
            .max_runs(10)
            .build()
            .unwrap();

        assert!(!config.enhanced_mode);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.cost_rates.len(), 3);
        assert_eq!(config.sector_keywords_for("aerospace"), ["aircraft", "defense"]);
        assert_eq!(config.analyzer, AnalyzerKind::Heuristic);
        assert_eq!(config.max_runs, Some(10));
    }

    #[test]
    fn test_builder_overrides_default_sector_in_any_case() {
        let config = EvalConfig::builder()
            .sector("technology", ["semiconductor"])
            .build()
            .unwrap();

        assert_eq!(config.sector_keywords.len(), 5);
        assert_eq!(config.sector_keywords_for("Technology"), ["semiconductor"]);
        assert_eq!(config.sector_keywords_for("TECHNOLOGY"), ["semiconductor"]);

        let result = crate::checks::check_sector_relevance(
            "Semiconductor demand is rising.",
            "technology",
            config.sector_keywords_for("technology"),
        );
        assert!(result.passed);
        assert_eq!(result.score, 0.8);
    }

    #[test]
    fn test_from_file_sector_keys_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.json");
        std::fs::write(
            &path,
            r#"{"sector_keywords": {" TECHNOLOGY ": ["chips"], "Mining": ["gold"]}}"#,
        )
        .unwrap();

        let config = EvalConfig::from_file(&path).unwrap();
        assert_eq!(config.sector_keywords.len(), 2);
        assert_eq!(config.sector_keywords_for("Technology"), ["chips"]);
        assert_eq!(config.sector_keywords_for("mining"), ["gold"]);
    }

    #[test]
    fn test_validation() {
        let result = EvalConfig::builder().max_runs(0).build();
        assert!(matches!(result, Err(EvalError::Config(_))));

        let result = EvalConfig::builder().model("  ").build();
        assert!(result.is_err());

        let result = EvalConfig::builder()
            .cost_rate("broken", CostRate::new(-1.0, 0.0))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.toml");
        std::fs::write(
            &path,
            r#"
model = "gpt-3.5-turbo"
enhanced_mode = false

[cost_rates.gpt-4o]
input_per_1k = 0.005
output_per_1k = 0.015
"#,
        )
        .unwrap();

        let config = EvalConfig::from_file(&path).unwrap();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(!config.enhanced_mode);
        assert_eq!(config.cost_rate("gpt-4o"), Some(CostRate::new(0.005, 0.015)));
        // A file-provided table replaces the default one
        assert_eq!(config.cost_rate("gpt-4"), None);
        assert_eq!(config.sector_keywords.len(), 5);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
