//! Batch inputs: eval-set rows and evaluation requests

use crate::error::Result;
use finsight_core::ReportRequest;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::debug;

/// One row of the eval-set CSV
///
/// Empty text cells and numeric cells that do not parse are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalCase {
    pub company_name: String,

    #[serde(default, deserialize_with = "non_empty_text")]
    pub expected_ticker: Option<String>,

    #[serde(default, deserialize_with = "non_empty_text")]
    pub sector: Option<String>,

    #[serde(rename = "52week_high", default, deserialize_with = "lenient_number")]
    pub week52_high: Option<f64>,

    #[serde(rename = "52week_low", default, deserialize_with = "lenient_number")]
    pub week52_low: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub expected_price: Option<f64>,
}

impl EvalCase {
    pub fn to_request(&self) -> EvalRequest {
        EvalRequest {
            company_input: self.company_name.clone(),
            expected_price: self.expected_price,
            expected_ticker: self.expected_ticker.clone(),
            sector: self.sector.clone(),
            high: self.week52_high,
            low: self.week52_low,
        }
    }
}

fn non_empty_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| s.trim().parse::<f64>().ok()))
}

/// Load an eval set from CSV
///
/// Expected header: `company_name,expected_ticker,sector,52week_high,52week_low`
/// with an optional `expected_price` column.
pub fn load_eval_set(path: impl AsRef<Path>) -> Result<Vec<EvalCase>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let cases = reader
        .deserialize()
        .collect::<std::result::Result<Vec<EvalCase>, _>>()?;

    debug!(path = %path.display(), cases = cases.len(), "Loaded eval set");
    Ok(cases)
}

/// Everything the orchestrator needs for one run
///
/// Reference values are optional; each one that is present enables the
/// matching check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalRequest {
    pub company_input: String,
    pub expected_price: Option<f64>,
    pub expected_ticker: Option<String>,
    pub sector: Option<String>,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl EvalRequest {
    pub fn new(company_input: impl Into<String>) -> Self {
        Self {
            company_input: company_input.into(),
            ..Self::default()
        }
    }

    pub fn with_expected_price(mut self, price: f64) -> Self {
        self.expected_price = Some(price);
        self
    }

    pub fn with_expected_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.expected_ticker = Some(ticker.into());
        self
    }

    /// Set the sector, trimmed; a blank sector leaves it unset
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        let sector = sector.into();
        let sector = sector.trim();
        self.sector = (!sector.is_empty()).then(|| sector.to_string());
        self
    }

    /// Set the 52-week range
    pub fn with_price_range(mut self, low: f64, high: f64) -> Self {
        self.low = Some(low);
        self.high = Some(high);
        self
    }

    /// What the report generator is asked for
    pub fn to_report_request(&self) -> ReportRequest {
        let request = ReportRequest::new(&self.company_input);
        match &self.sector {
            Some(sector) => request.with_sector(sector),
            None => request,
        }
    }
}
