//! Text side of message recovery.
//!
//! This module provides:
//! - The character classes a message is made of
//! - Dictionary loading
//! - Dictionary-based validity scoring

pub mod charset;
pub mod dictionary;
pub mod score;

pub use charset::{is_message_char, is_message_text};
pub use dictionary::{Dictionary, DictionaryError};
pub use score::Scorer;
