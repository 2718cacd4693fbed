//! Word and sentence segmentation shared by the metrics and analyzers
//!
//! Lengths are counted in characters, not bytes.

use regex::Regex;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['’]\p{L}+)*").expect("valid word pattern"));

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid sentence pattern"));

/// Words in reading order
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|m| m.as_str())
}

/// Number of sentences that contain at least one letter or digit
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_END
        .split(text)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

/// Length in characters
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Count how many of `keywords` occur in `text`, each at most once
///
/// `text` must already be lowercase.
pub fn count_present(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words() {
        let found: Vec<_> = words("Apple's revenue rose 12% to $94.8B, didn’t it?").collect();
        assert_eq!(
            found,
            ["Apple's", "revenue", "rose", "12", "to", "94", "8B", "didn’t", "it"]
        );
    }

    #[test]
    fn test_words_keep_accented_letters() {
        let found: Vec<_> = words("Société Générale and L'Oréal beat Nestlé.").collect();
        assert_eq!(found, ["Société", "Générale", "and", "L'Oréal", "beat", "Nestlé"]);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("Shares trade at $123.45 today. Outlook is strong!"), 2);
        assert_eq!(sentence_count("No terminal punctuation"), 1);
        assert_eq!(sentence_count("Wait... what?! Yes."), 3);
        assert_eq!(sentence_count("  ... !!! "), 0);
        assert_eq!(sentence_count(""), 0);
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("€100"), 4);
    }

    #[test]
    fn test_count_present() {
        assert_eq!(count_present("earnings beat, earnings again", &["earnings", "loss"]), 1);
    }
}
