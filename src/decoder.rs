//! Message recovery.
//!
//! This module orchestrates the decode:
//! 1. For each byte offset 0..8, reconstruct one candidate stream per plane
//! 2. Search every start position of those streams for a message
//! 3. Return the first message the scorer accepts, lowest offset first
//!
//! Not finding a message is an expected outcome and is reported as `None`.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use crate::config::{ConfigError, DecoderConfig};
use crate::search::{Found, Searcher};
use crate::stego::planes::{CandidateStreams, BITS_IN_BYTE};
use crate::text::dictionary::Dictionary;
use crate::text::score::Scorer;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::Ordering;

/// A recovered message and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    /// The recovered text.
    pub message: String,
    /// Byte offset (0..8) of the candidate streams holding the message.
    pub offset: usize,
    /// Index of the first character within those streams.
    pub start: usize,
    /// Index of the first pixel byte carrying the message.
    pub byte_start: usize,
    /// Bit planes used, in order of first use.
    pub planes: Vec<usize>,
}

impl DecodedMessage {
    fn from_found(found: Found, offset: usize) -> Self {
        Self {
            byte_start: offset + BITS_IN_BYTE * found.start,
            message: found.message,
            offset,
            start: found.start,
            planes: found.planes,
        }
    }
}

/// Recovers hidden messages from pixel bytes.
///
/// The dictionary is shared read-only, so one decoder can serve many threads.
#[derive(Debug, Clone)]
pub struct Decoder {
    scorer: Scorer,
    config: DecoderConfig,
}

impl Decoder {
    /// Creates a decoder, rejecting an unusable configuration up front.
    pub fn new(dictionary: Arc<Dictionary>, config: DecoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let scorer = Scorer::with_thresholds(dictionary, config.min_words, config.valid_ratio);
        Ok(Self { scorer, config })
    }

    /// Creates a decoder with the default configuration.
    pub fn with_defaults(dictionary: Arc<Dictionary>) -> Self {
        let config = DecoderConfig::default();
        let scorer = Scorer::with_thresholds(dictionary, config.min_words, config.valid_ratio);
        Self { scorer, config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Searches all byte offsets for a hidden message.
    pub fn decode(&self, pixels: &[u8]) -> Option<DecodedMessage> {
        log::debug!(
            "Decoding {} bytes over {} offsets and {} planes",
            pixels.len(),
            BITS_IN_BYTE,
            self.config.lookup_planes
        );

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                // Offsets above the lowest one with a message stop early.
                let best = AtomicUsize::new(usize::MAX);
                return (0..BITS_IN_BYTE).into_par_iter().find_map_first(|offset| {
                    let decoded = self.search_offset(pixels, offset, Some(&best))?;
                    best.fetch_min(offset, Ordering::Relaxed);
                    Some(decoded)
                });
            }
        }

        (0..BITS_IN_BYTE).find_map(|offset| self.decode_offset(pixels, offset))
    }

    /// Searches a single byte offset.
    pub fn decode_offset(&self, pixels: &[u8], offset: usize) -> Option<DecodedMessage> {
        self.search_offset(pixels, offset, None)
    }

    fn search_offset(&self, pixels: &[u8], offset: usize, best: Option<&AtomicUsize>) -> Option<DecodedMessage> {
        let streams = CandidateStreams::for_offset(pixels, offset, self.config.lookup_planes);
        if streams.is_empty() {
            return None;
        }

        let mut searcher = Searcher::new(&self.scorer, self.config.limits());
        if let Some(best) = best {
            searcher = searcher.with_cancellation(best, offset);
        }
        let found = searcher.find_message(streams.streams())?;

        log::debug!(
            "Offset {}: message of {} chars at position {} (planes {:?})",
            offset,
            found.message.len(),
            found.start,
            found.planes
        );
        Some(DecodedMessage::from_found(found, offset))
    }
}

/// Recovers a message with the default configuration.
pub fn decode(pixels: &[u8], dictionary: Arc<Dictionary>) -> Option<String> {
    Decoder::with_defaults(dictionary)
        .decode(pixels)
        .map(|decoded| decoded.message)
}
