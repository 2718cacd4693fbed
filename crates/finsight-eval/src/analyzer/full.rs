//! Lexicon sentiment plus Flesch readability

use super::{Lexicon, TextAnalyzer, TextScores};
use crate::config::EvalConfig;
use crate::error::{EvalError, Result};
use crate::metrics::flesch_reading_ease;
use crate::text;
use tracing::info;

pub struct FullAnalyzer {
    lexicon: Lexicon,
    max_chars: usize,
}

impl FullAnalyzer {
    pub fn new(lexicon: Lexicon, max_chars: usize) -> Self {
        Self { lexicon, max_chars }
    }

    /// Build from config, loading the lexicon override if one is set
    pub fn from_config(config: &EvalConfig) -> Result<Self> {
        let lexicon = match &config.lexicon_path {
            Some(path) => {
                let lexicon = Lexicon::from_file(path)?;
                info!(path = %path.display(), words = lexicon.words.len(), "Loaded sentiment lexicon");
                lexicon
            }
            None => Lexicon::default(),
        };
        Ok(Self::new(lexicon, config.max_analyzer_chars))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl TextAnalyzer for FullAnalyzer {
    fn analyze(&self, text: &str) -> Result<TextScores> {
        let len = text::char_len(text);
        if len > self.max_chars {
            return Err(EvalError::TextTooLong {
                len,
                max: self.max_chars,
            });
        }

        Ok(TextScores {
            sentiment: self.lexicon.polarity(text),
            readability: flesch_reading_ease(text),
        })
    }

    fn name(&self) -> &str {
        "full"
    }
}
