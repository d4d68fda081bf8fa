//! LSB steganography over flat pixel byte streams.
//!
//! - [`embed`]: writes message bits into one bit plane
//! - [`planes`]: reconstructs candidate byte streams per plane and offset
//! - [`image`]: converts image files to and from pixel byte streams

pub mod embed;
pub mod image;
pub mod planes;

pub use embed::{capacity_bits, hide, hide_at, EmbedError};
pub use image::{hidden_path, PixelImage, PixelImageError};
pub use planes::{extract_planes, CandidateStreams, BITS_IN_BYTE};
