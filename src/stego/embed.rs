//! LSB embedding.
//!
//! Each bit of the message (MSB first, bytes in message order) replaces one
//! bit of one pixel byte. The extractor in [`super::planes`] packs in the same
//! order, so a message hidden at plane 0 and byte 0 reads back unchanged from
//! candidate stream (plane 0, offset 0).

use thiserror::Error;

use super::planes::BITS_IN_BYTE;

/// Errors that can occur while hiding a message.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EmbedError {
    #[error("Message too large: need {needed} bits, have capacity for {capacity}")]
    MessageTooLarge { needed: usize, capacity: usize },

    #[error("Invalid bit plane {0}: must be below 8")]
    InvalidPlane(usize),

    #[error("Start byte {start} is past the end of {len} pixel bytes")]
    StartOutOfRange { start: usize, len: usize },
}

/// Number of message bits that fit in `len` pixel bytes starting at `start`.
pub fn capacity_bits(len: usize, start: usize) -> usize {
    len.saturating_sub(start)
}

/// Expands bytes into bits, MSB first.
pub fn message_bits(message: &[u8]) -> impl Iterator<Item = u8> + '_ {
    message
        .iter()
        .flat_map(|&byte| (0..BITS_IN_BYTE).rev().map(move |i| (byte >> i) & 1))
}

/// Hides `message` in bit 0 of `pixels`, starting at the first byte.
///
/// Only bit 0 of the first `8 * message.len()` bytes can change.
pub fn hide(pixels: &mut [u8], message: &str) -> Result<(), EmbedError> {
    hide_at(pixels, message, 0, 0)
}

/// Hides `message` in bit `plane` of `pixels`, starting at byte `start`.
pub fn hide_at(pixels: &mut [u8], message: &str, start: usize, plane: usize) -> Result<(), EmbedError> {
    hide_bytes_at(pixels, message.as_bytes(), start, plane)
}

/// Hides raw bytes in bit `plane` of `pixels`, starting at byte `start`.
pub fn hide_bytes_at(pixels: &mut [u8], data: &[u8], start: usize, plane: usize) -> Result<(), EmbedError> {
    if plane >= BITS_IN_BYTE {
        return Err(EmbedError::InvalidPlane(plane));
    }

    let len = pixels.len();
    let needed = data.len() * BITS_IN_BYTE;
    let capacity = capacity_bits(len, start);
    if needed > capacity {
        return Err(EmbedError::MessageTooLarge { needed, capacity });
    }

    let Some(target) = pixels.get_mut(start..) else {
        return Err(EmbedError::StartOutOfRange { start, len });
    };

    let keep = !(1u8 << plane);
    for (pixel, bit) in target.iter_mut().zip(message_bits(data)) {
        *pixel = (*pixel & keep) | (bit << plane);
    }

    Ok(())
}
