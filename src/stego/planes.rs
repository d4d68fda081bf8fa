//! Bit-plane extraction.
//!
//! A bit plane is bit `p` of every pixel byte. Packing 8 consecutive plane
//! bits (MSB first) gives one reconstructed byte; since the message need not
//! start on a multiple of 8 bytes, packing is done for each of the 8 possible
//! starting alignments.

/// Number of bits in a byte, and therefore the number of byte offsets.
pub const BITS_IN_BYTE: usize = 8;

/// Extracts bit `plane` of every byte as a 0/1 sequence.
pub fn plane_bits(pixels: &[u8], plane: usize) -> Vec<u8> {
    debug_assert!(plane < BITS_IN_BYTE);
    let mask = 1u8 << plane;
    pixels.iter().map(|&b| (b & mask) >> plane).collect()
}

/// Packs a 0/1 sequence into bytes, MSB first, starting at bit `offset`.
///
/// Trailing bits that do not fill a whole byte are dropped, so the output has
/// `(bits.len() - offset) / 8` bytes, or none if `bits.len() <= offset`.
pub fn pack_bits(bits: &[u8], offset: usize) -> Vec<u8> {
    if bits.len() <= offset {
        return Vec::new();
    }

    bits[offset..]
        .chunks_exact(BITS_IN_BYTE)
        .map(|group| group.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
        .collect()
}

/// Reconstructs the byte stream hidden in `plane` at byte `offset`.
pub fn candidate_stream(pixels: &[u8], plane: usize, offset: usize) -> Vec<u8> {
    pack_bits(&plane_bits(pixels, plane), offset)
}

/// The candidate streams of one byte offset, one per bit plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateStreams {
    offset: usize,
    streams: Vec<Vec<u8>>,
}

impl CandidateStreams {
    /// Extracts planes `0..planes` of `pixels` at byte `offset`.
    pub fn for_offset(pixels: &[u8], offset: usize, planes: usize) -> Self {
        let streams = (0..planes)
            .map(|plane| candidate_stream(pixels, plane, offset))
            .collect();
        Self { offset, streams }
    }

    /// Wraps already reconstructed streams.
    pub fn from_streams(offset: usize, streams: Vec<Vec<u8>>) -> Self {
        Self { offset, streams }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Streams indexed by bit plane.
    pub fn streams(&self) -> &[Vec<u8>] {
        &self.streams
    }

    /// The stream of one plane, if extracted.
    pub fn plane(&self, plane: usize) -> Option<&[u8]> {
        self.streams.get(plane).map(Vec::as_slice)
    }

    /// Length of the shortest stream (all are equal for extracted streams).
    pub fn len(&self) -> usize {
        self.streams.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts the candidate streams of all 8 byte offsets.
///
/// The result is indexed by offset, and each entry by plane.
pub fn extract_planes(pixels: &[u8], planes: usize) -> Vec<CandidateStreams> {
    (0..BITS_IN_BYTE)
        .map(|offset| CandidateStreams::for_offset(pixels, offset, planes))
        .collect()
}
