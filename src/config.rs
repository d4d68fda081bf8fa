//! Decoder configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! lookup_planes = 3
//! min_words = 20
//! valid_ratio = 0.5
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::{SearchLimits, DEFAULT_MAX_MESSAGE_LEN, DEFAULT_NODE_BUDGET};
use crate::stego::planes::BITS_IN_BYTE;
use crate::text::score::{DEFAULT_MIN_WORDS, DEFAULT_VALID_RATIO};

/// Default number of low bit planes searched.
pub const DEFAULT_LOOKUP_PLANES: usize = 3;

/// Errors that can occur while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Parameters of a decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Number of low bit planes to search (1 to 8).
    pub lookup_planes: usize,

    /// Minimum number of words in an accepted message.
    pub min_words: usize,

    /// Fraction of dictionary words an accepted message must exceed.
    pub valid_ratio: f64,

    /// Longest message the search will build.
    pub max_message_len: usize,

    /// Nodes expanded per start position before giving up on it.
    pub node_budget: usize,

    /// Search byte offsets in parallel (requires the `parallel` feature).
    pub parallel: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            lookup_planes: DEFAULT_LOOKUP_PLANES,
            min_words: DEFAULT_MIN_WORDS,
            valid_ratio: DEFAULT_VALID_RATIO,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            node_budget: DEFAULT_NODE_BUDGET,
            parallel: true,
        }
    }
}

impl DecoderConfig {
    /// Loads a configuration from a TOML file and validates it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DecoderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup_planes == 0 || self.lookup_planes > BITS_IN_BYTE {
            return Err(ConfigError::Invalid(format!(
                "lookup_planes must be between 1 and {}, got {}",
                BITS_IN_BYTE, self.lookup_planes
            )));
        }
        if self.min_words == 0 {
            return Err(ConfigError::Invalid("min_words must be at least 1".to_string()));
        }
        if !(0.0..1.0).contains(&self.valid_ratio) {
            return Err(ConfigError::Invalid(format!(
                "valid_ratio must be in [0, 1), got {}",
                self.valid_ratio
            )));
        }
        if self.max_message_len == 0 {
            return Err(ConfigError::Invalid("max_message_len must be at least 1".to_string()));
        }
        if self.node_budget == 0 {
            return Err(ConfigError::Invalid("node_budget must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Search bounds derived from this configuration.
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_message_len: self.max_message_len,
            node_budget: self.node_budget,
        }
    }
}
