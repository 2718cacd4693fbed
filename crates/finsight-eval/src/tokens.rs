//! Token counting for cost estimation

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use tiktoken_rs::CoreBPE;

/// Counts tokens the way the priced model would
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;

    fn name(&self) -> &str;
}

/// cl100k_base subword tokenizer (GPT-3.5 / GPT-4 family)
pub struct Cl100kTokenCounter {
    bpe: CoreBPE,
}

impl Cl100kTokenCounter {
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| EvalError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for Cl100kTokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    fn name(&self) -> &str {
        "cl100k_base"
    }
}

/// Where the token counts behind a cost figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    /// Usage reported by the model provider
    Provider,
    /// Tokenized locally from the company input and the report
    Estimated,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Estimated => "estimated",
        }
    }
}
