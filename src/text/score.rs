//! Validity scoring for candidate messages.
//!
//! A candidate reads like text when it has enough words and more than a
//! given fraction of them are dictionary words.

use std::sync::Arc;

use super::charset::{TRAILING_STRIP, WORD_SEP};
use super::dictionary::Dictionary;

/// Default minimum number of words in a message.
pub const DEFAULT_MIN_WORDS: usize = 20;

/// Default fraction of words that must be recognized (strictly exceeded).
pub const DEFAULT_VALID_RATIO: f64 = 0.5;

/// Dictionary-backed scorer.
#[derive(Debug, Clone)]
pub struct Scorer {
    dictionary: Arc<Dictionary>,
    min_words: usize,
    valid_ratio: f64,
}

impl Scorer {
    /// Creates a scorer with the default thresholds.
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self::with_thresholds(dictionary, DEFAULT_MIN_WORDS, DEFAULT_VALID_RATIO)
    }

    /// Creates a scorer with explicit thresholds.
    pub fn with_thresholds(dictionary: Arc<Dictionary>, min_words: usize, valid_ratio: f64) -> Self {
        Self {
            dictionary,
            min_words,
            valid_ratio,
        }
    }

    pub fn min_words(&self) -> usize {
        self.min_words
    }

    pub fn valid_ratio(&self) -> f64 {
        self.valid_ratio
    }

    /// Returns true if `word` counts as recognized.
    ///
    /// Trailing punctuation and separators are stripped and the rest is
    /// lower-cased before the lookup.
    pub fn recognizes(&self, word: &str) -> bool {
        let stripped = word.trim_end_matches(TRAILING_STRIP);
        if stripped.is_empty() {
            return false;
        }
        if stripped.bytes().any(|b| b.is_ascii_uppercase()) {
            self.dictionary.contains(&stripped.to_ascii_lowercase())
        } else {
            self.dictionary.contains(stripped)
        }
    }

    /// Verdict for a candidate with `words` words of which `recognized` are
    /// dictionary words.
    pub fn accepts(&self, words: usize, recognized: usize) -> bool {
        words >= self.min_words && words > 0 && recognized as f64 / words as f64 > self.valid_ratio
    }

    /// Classifies a complete candidate as message-like or not.
    pub fn is_valid(&self, candidate: &str) -> bool {
        let mut words = 0;
        let mut recognized = 0;
        for word in candidate.split(WORD_SEP as char) {
            words += 1;
            if self.recognizes(word) {
                recognized += 1;
            }
        }
        self.accepts(words, recognized)
    }
}
