//! Word-polarity lexicon for sentiment scoring

use crate::error::{EvalError, Result};
use crate::text;
use finsight_utils::load_config_file;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// How many preceding words a negator reaches
const NEGATION_WINDOW: usize = 3;
/// Negated words flip and lose some strength
const NEGATION_SCALAR: f64 = -0.74;
/// Normalisation constant for the summed valence
const NORMALIZATION_ALPHA: f64 = 1.0;

const POSITIVE: &[(&str, f64)] = &[
    ("attractive", 0.5),
    ("beat", 0.4),
    ("boost", 0.5),
    ("breakthrough", 0.6),
    ("bullish", 0.7),
    ("confident", 0.5),
    ("excellent", 0.8),
    ("exceeded", 0.5),
    ("expansion", 0.4),
    ("favorable", 0.5),
    ("gain", 0.5),
    ("gains", 0.5),
    ("good", 0.5),
    ("great", 0.7),
    ("growth", 0.5),
    ("healthy", 0.5),
    ("improve", 0.5),
    ("improved", 0.5),
    ("improving", 0.5),
    ("innovation", 0.4),
    ("innovative", 0.5),
    ("leader", 0.3),
    ("leading", 0.3),
    ("momentum", 0.3),
    ("opportunities", 0.5),
    ("opportunity", 0.5),
    ("optimism", 0.6),
    ("optimistic", 0.6),
    ("outperform", 0.6),
    ("positive", 0.5),
    ("profit", 0.5),
    ("profitable", 0.6),
    ("rally", 0.5),
    ("record", 0.3),
    ("recovery", 0.5),
    ("resilient", 0.5),
    ("robust", 0.6),
    ("stable", 0.3),
    ("strong", 0.6),
    ("success", 0.7),
    ("successful", 0.7),
    ("surge", 0.6),
    ("upgrade", 0.5),
    ("upside", 0.5),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bad", -0.6),
    ("bearish", -0.7),
    ("concern", -0.4),
    ("concerns", -0.4),
    ("crash", -0.8),
    ("crisis", -0.8),
    ("debt", -0.3),
    ("decline", -0.5),
    ("declined", -0.5),
    ("declining", -0.5),
    ("downgrade", -0.5),
    ("downside", -0.5),
    ("drop", -0.4),
    ("error", -0.4),
    ("fail", -0.6),
    ("failed", -0.6),
    ("failure", -0.7),
    ("fall", -0.4),
    ("fell", -0.4),
    ("fraud", -0.9),
    ("headwinds", -0.4),
    ("inflation", -0.2),
    ("lawsuit", -0.5),
    ("layoffs", -0.6),
    ("litigation", -0.4),
    ("loss", -0.6),
    ("losses", -0.6),
    ("miss", -0.4),
    ("missed", -0.5),
    ("negative", -0.5),
    ("plunge", -0.7),
    ("poor", -0.6),
    ("pressure", -0.3),
    ("recession", -0.7),
    ("risk", -0.3),
    ("risks", -0.3),
    ("risky", -0.5),
    ("slowdown", -0.5),
    ("threat", -0.5),
    ("uncertain", -0.4),
    ("uncertainty", -0.4),
    ("unable", -0.4),
    ("underperform", -0.6),
    ("volatile", -0.4),
    ("volatility", -0.3),
    ("weak", -0.6),
    ("weakness", -0.5),
];

const NEGATORS: &[&str] = &[
    "aren't", "cannot", "couldn't", "didn't", "doesn't", "don't", "hasn't", "haven't", "isn't",
    "neither", "never", "no", "nor", "not", "shouldn't", "wasn't", "weren't", "without", "won't",
    "wouldn't",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("exceptionally", 0.25),
    ("extremely", 0.25),
    ("highly", 0.15),
    ("remarkably", 0.2),
    ("significantly", 0.2),
    ("strongly", 0.2),
    ("substantially", 0.2),
    ("very", 0.15),
    ("marginally", -0.15),
    ("modestly", -0.1),
    ("slightly", -0.15),
    ("somewhat", -0.1),
];

/// Word polarities, negators and intensifiers
///
/// Polarities and intensifier boosts live in [-1, 1]. A negator within the
/// three preceding words flips a polarity; an intensifier directly before a
/// word strengthens (or, when negative, softens) it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    pub words: HashMap<String, f64>,
    #[serde(default)]
    pub negators: HashSet<String>,
    #[serde(default)]
    pub intensifiers: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            words: POSITIVE
                .iter()
                .chain(NEGATIVE)
                .map(|(w, v)| ((*w).to_string(), *v))
                .collect(),
            negators: NEGATORS.iter().map(|w| (*w).to_string()).collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|(w, v)| ((*w).to_string(), *v))
                .collect(),
        }
    }
}

impl Lexicon {
    /// Load a replacement lexicon from a JSON or TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let lexicon: Self = load_config_file(path)?;
        lexicon.normalized()
    }

    /// Lowercase keys and reject out-of-range values
    fn normalized(self) -> Result<Self> {
        if self.words.is_empty() {
            return Err(EvalError::Config("lexicon has no words".to_string()));
        }

        let in_range = |v: f64| v.is_finite() && (-1.0..=1.0).contains(&v);
        if let Some((word, _)) = self
            .words
            .iter()
            .chain(&self.intensifiers)
            .find(|(_, v)| !in_range(**v))
        {
            return Err(EvalError::Config(format!(
                "lexicon value for '{word}' must be between -1 and 1"
            )));
        }

        Ok(Self {
            words: self
                .words
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
            negators: self.negators.into_iter().map(|w| w.to_lowercase()).collect(),
            intensifiers: self
                .intensifiers
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
        })
    }

    /// Sentiment polarity of `text` in [-1, 1]; 0.0 when nothing matches
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens: Vec<String> = text::words(text)
            .map(|w| w.to_lowercase().replace('’', "'"))
            .collect();

        let mut total = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token) else {
                continue;
            };

            let mut valence = base;
            if let Some(boost) = i
                .checked_sub(1)
                .and_then(|prev| self.intensifiers.get(&tokens[prev]))
            {
                valence += base.signum() * boost;
            }

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| self.negators.contains(t)) {
                valence *= NEGATION_SCALAR;
            }

            total += valence;
        }

        if total == 0.0 {
            return 0.0;
        }
        (total / (total * total + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}
