//! Word dictionary used to tell recovered text apart from noise.
//!
//! The file format is one word per line. Lines are trimmed and lower-cased,
//! blank lines and lines starting with `#` are skipped.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading a dictionary.
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Dictionary contains no words")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An immutable set of lowercase words.
///
/// Built once, then shared (usually behind an `Arc`) by every search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Parses dictionary text.
    pub fn parse(text: &str) -> Result<Self, DictionaryError> {
        Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Loads and parses a dictionary file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Builds a dictionary from an iterator of words.
    ///
    /// Words are lower-cased; empty words are ignored.
    pub fn from_words<I, S>(words: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(DictionaryError::Empty);
        }

        Ok(Self { words })
    }

    /// Returns true if `word` is in the dictionary.
    ///
    /// The lookup is exact: callers normalize case and punctuation.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the dictionary holds no words, which a successfully
    /// constructed dictionary never does.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let dict = Dictionary::parse("# common words\nhello\n\n  World  \n#skip\nthe\n").unwrap();
        assert_eq!(dict.len(), 3);
        assert!(dict.contains("hello"));
        assert!(dict.contains("world"));
        assert!(dict.contains("the"));
        assert!(!dict.contains("skip"));
        assert!(!dict.contains("World"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let dict = Dictionary::parse("Hello\nhello\nHELLO\n").unwrap();
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_empty_dictionary_is_error() {
        assert!(matches!(Dictionary::parse(""), Err(DictionaryError::Empty)));
        assert!(matches!(
            Dictionary::parse("# only a comment\n\n   \n"),
            Err(DictionaryError::Empty)
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha").unwrap();
        writeln!(file, "beta").unwrap();

        let dict = Dictionary::from_file(file.path()).unwrap();
        assert!(dict.contains("alpha"));
        assert!(dict.contains("beta"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Dictionary::from_file(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(DictionaryError::Io(_))));
    }
}
