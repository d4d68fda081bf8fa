//! # planescan - find text hidden in image bit planes
//!
//! planescan hides a short plaintext message in the least significant bits of
//! an image's pixel bytes, and recovers it without being told which bit plane
//! or byte alignment was used.
//!
//! ## Overview
//!
//! - **Hide**: message bits, MSB first, overwrite bit 0 of consecutive pixel bytes
//! - **Extract**: for each byte offset 0..8 and each low bit plane, pack the
//!   plane's bits back into a candidate byte stream
//! - **Search**: walk the candidate streams from every start position, taking
//!   each character from any plane but switching planes only next to a space
//! - **Score**: accept a candidate when it has enough words and more than half
//!   of them are dictionary words
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use planescan::{hide, Decoder, DecoderConfig, Dictionary};
//!
//! let dictionary = Arc::new(Dictionary::parse("hello\nworld\nfrom\nthe\nimage\n").unwrap());
//! let mut pixels = vec![0u8; 512];
//! hide(&mut pixels, "hello world from the image").unwrap();
//!
//! let config = DecoderConfig { min_words: 5, ..Default::default() };
//! let decoder = Decoder::new(dictionary, config).unwrap();
//! let decoded = decoder.decode(&pixels).unwrap();
//! assert_eq!(decoded.message, "hello world from the image");
//! ```
//!
//! ## Modules
//!
//! - [`stego`]: embedding, bit-plane extraction, image carriers
//! - [`text`]: character classes, dictionary, validity scoring
//! - [`search`]: backtracking candidate search for one byte offset
//! - [`decoder`]: search over all byte offsets
//! - [`config`]: decoder configuration

/// Name of the file the CLI writes a recovered message to.
pub const DEFAULT_OUTPUT_FILE: &str = "ID.txt";

/// Dictionary file the CLI reads when none is given.
pub const DEFAULT_DICTIONARY_FILE: &str = "dictionary.txt";

pub mod config;
pub mod decoder;
pub mod search;
pub mod stego;
pub mod text;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, DecoderConfig};
pub use decoder::{decode, DecodedMessage, Decoder};
pub use search::{Found, SearchLimits, Searcher};
pub use stego::{extract_planes, hide, hide_at, CandidateStreams, EmbedError, PixelImage, PixelImageError};
pub use text::{Dictionary, DictionaryError, Scorer};
