//! Character classes a hidden message may be built from.
//!
//! A message is ASCII letters, a single separator between words, and a few
//! sentence punctuation marks. Everything else ends a candidate.

/// Separator between words.
pub const WORD_SEP: u8 = b' ';

/// Punctuation allowed in addition to letters and the separator.
pub const PUNCTUATION: &[u8] = b",.!?";

/// Punctuation that ends a sentence.
pub const SENTENCE_END: &[u8] = b".!?";

/// Characters stripped from the end of a word before dictionary lookup.
pub const TRAILING_STRIP: &[char] = &[' ', ',', '.', '!', '?'];

/// Returns true if `byte` may appear anywhere in a message.
pub fn is_message_char(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == WORD_SEP || PUNCTUATION.contains(&byte)
}

/// Returns true if `byte` is the word separator.
#[inline]
pub fn is_separator(byte: u8) -> bool {
    byte == WORD_SEP
}

/// Returns true if `byte` ends a sentence.
pub fn is_sentence_end(byte: u8) -> bool {
    SENTENCE_END.contains(&byte)
}

/// Returns true if every byte of `text` is a message character.
pub fn is_message_text(text: &str) -> bool {
    text.bytes().all(is_message_char)
}
