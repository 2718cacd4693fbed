//! Text analyzers backing the content quality check
//!
//! [`FullAnalyzer`] scores sentiment with a word lexicon and readability with
//! the Flesch Reading Ease formula. [`HeuristicAnalyzer`] never produces
//! scores, which makes content quality fall back to the section completeness
//! and length formula. The evaluator picks one when it is constructed.

pub mod full;
pub mod lexicon;

pub use full::FullAnalyzer;
pub use lexicon::Lexicon;

use crate::error::{EvalError, Result};

/// Scores produced by a full text analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextScores {
    /// Polarity in [-1, 1]
    pub sentiment: f64,
    /// Flesch Reading Ease in [0, 100]
    pub readability: f64,
}

/// Anything that can score report prose
///
/// An error means "no scores for this text"; callers degrade to the
/// heuristic formula rather than failing.
pub trait TextAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<TextScores>;

    fn name(&self) -> &str;
}

/// Analyzer used when full analysis is disabled or could not be set up
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl TextAnalyzer for HeuristicAnalyzer {
    fn analyze(&self, _text: &str) -> Result<TextScores> {
        Err(EvalError::AnalysisUnavailable)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_never_scores() {
        let analyzer = HeuristicAnalyzer;
        assert!(matches!(
            analyzer.analyze("Strong growth ahead."),
            Err(EvalError::AnalysisUnavailable)
        ));
        assert_eq!(analyzer.name(), "heuristic");
    }
}
