//! Integration tests for planescan
//!
//! Note: not finding a message is a normal outcome and shows up as `None`.
//!
//! Covers:
//! - Hide/decode roundtrips on zeroed and non-zero covers
//! - Byte offset and start position search
//! - Plane switching at word boundaries (and only there)
//! - Negative controls
//! - File-based carriers, dictionaries and configs

use std::sync::Arc;

use planescan::stego::planes::candidate_stream;
use planescan::{
    decode, extract_planes, hide, hide_at, Decoder, DecoderConfig, Dictionary, EmbedError,
    PixelImage, Scorer,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const DICTIONARY: &str = "\
# test word list
the
quick
brown
fox
jumps
over
lazy
dog
while
old
cat
sleeps
in
warm
sun
and
birds
sing
all
day
long
hello
world
what
up
for
real
hi
my
friend
do
you
mean
";

/// 25 words, all in the dictionary.
const MESSAGE: &str = "The quick brown fox jumps over the lazy dog while the old cat sleeps \
in the warm sun and the birds sing all day long.";

fn dictionary() -> Arc<Dictionary> {
    Arc::new(Dictionary::parse(DICTIONARY).unwrap())
}

fn decoder_with_min_words(min_words: usize) -> Decoder {
    let config = DecoderConfig {
        min_words,
        ..Default::default()
    };
    Decoder::new(dictionary(), config).unwrap()
}

/// A non-zero cover whose three low bits are all set, so every plane reads
/// 0xFF (never a message character) outside the hidden message.
fn bright_cover(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 37) % 256) as u8 | 0b0000_0111).collect()
}

/// A deterministic noise cover.
fn noise_cover(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen::<u8>()).collect()
}

/// Hides each word (with its trailing space) in alternating planes 0 and 2.
fn hide_alternating(pixels: &mut [u8], message: &str) {
    let mut pos = 0;
    for (i, segment) in message.split_inclusive(' ').enumerate() {
        let plane = if i % 2 == 0 { 0 } else { 2 };
        hide_at(pixels, segment, pos * 8, plane).unwrap();
        pos += segment.len();
    }
}

// ============================================================================
// Roundtrips
// ============================================================================

#[test]
fn test_roundtrip_zero_cover() {
    let mut pixels = vec![0u8; 2048];
    hide(&mut pixels, MESSAGE).unwrap();

    let decoded = Decoder::new(dictionary(), DecoderConfig::default())
        .unwrap()
        .decode(&pixels)
        .unwrap();
    assert_eq!(decoded.message, MESSAGE);
    assert_eq!(decoded.byte_start, 0);
    assert_eq!(decoded.planes, vec![0]);
}

#[test]
fn test_roundtrip_non_zero_cover() {
    let mut pixels = bright_cover(48 * 48 * 4);
    hide(&mut pixels, MESSAGE).unwrap();

    assert_eq!(decode(&pixels, dictionary()), Some(MESSAGE.to_string()));
}

#[test]
fn test_roundtrip_noise_covers() {
    for seed in 0..20 {
        let mut pixels = noise_cover(48 * 48 * 4, seed);
        hide(&mut pixels, MESSAGE).unwrap();

        let decoded = Decoder::new(dictionary(), DecoderConfig::default())
            .unwrap()
            .decode(&pixels)
            .unwrap_or_else(|| panic!("seed {}: message not found", seed));
        assert_eq!(decoded.message, MESSAGE, "seed {}", seed);
        assert_eq!(decoded.byte_start, 0);
    }
}

#[test]
fn test_noise_cover_keeps_message_prefix() {
    // Noise right after the message can still read as trailing punctuation,
    // which stays attached to the last word.
    for seed in 20..60 {
        let mut pixels = noise_cover(48 * 48 * 4, seed);
        hide(&mut pixels, MESSAGE).unwrap();

        let message = decode(&pixels, dictionary()).unwrap();
        assert!(message.starts_with(MESSAGE), "seed {}: {:?}", seed, message);
        assert!(
            message[MESSAGE.len()..].bytes().all(|b| b",.!?".contains(&b)),
            "seed {}: {:?}",
            seed,
            message
        );
    }
}

#[test]
fn test_hello_world_scenario() {
    // Six words: below the default minimum, so the minimum is lowered.
    let message = "Hello World, what up? For real!";
    let mut pixels = bright_cover(48 * 48 * 4);
    hide(&mut pixels, message).unwrap();

    let decoded = decoder_with_min_words(6).decode(&pixels).unwrap();
    assert_eq!(decoded.message, message);

    // With the default minimum the same image holds no acceptable message.
    assert!(decode(&pixels, dictionary()).is_none());
}

#[test]
fn test_punctuation_runs_on_zero_cover() {
    let message = "Hi my friend.... What do you mean?";
    let mut pixels = vec![0u8; 48 * 48 * 4];
    hide(&mut pixels, message).unwrap();

    let decoded = decoder_with_min_words(7).decode(&pixels).unwrap();
    assert_eq!(decoded.message, message);
}

// ============================================================================
// Offset search
// ============================================================================

#[test]
fn test_offset_invariance() {
    for start in [0usize, 1, 7, 8, 63] {
        let mut pixels = vec![0u8; 2048];
        hide_at(&mut pixels, MESSAGE, start, 0).unwrap();

        let decoded = decoder_with_min_words(20)
            .decode(&pixels)
            .unwrap_or_else(|| panic!("message at byte {} not found", start));
        assert_eq!(decoded.message, MESSAGE, "start {}", start);
        assert_eq!(decoded.byte_start, start);
        assert_eq!(decoded.offset, start % 8);
        assert_eq!(decoded.start, start / 8);
    }
}

#[test]
fn test_message_in_higher_plane() {
    let mut pixels = vec![0u8; 2048];
    hide_at(&mut pixels, MESSAGE, 13, 2).unwrap();

    let decoded = decoder_with_min_words(20).decode(&pixels).unwrap();
    assert_eq!(decoded.message, MESSAGE);
    assert_eq!(decoded.planes, vec![2]);
    assert_eq!(decoded.byte_start, 13);
}

#[test]
fn test_sequential_search_agrees() {
    let mut pixels = vec![0u8; 2048];
    hide_at(&mut pixels, MESSAGE, 63, 1).unwrap();

    let config = DecoderConfig {
        parallel: false,
        ..Default::default()
    };
    let sequential = Decoder::new(dictionary(), config).unwrap().decode(&pixels);
    let parallel = decoder_with_min_words(20).decode(&pixels);
    assert_eq!(sequential, parallel);
    assert_eq!(sequential.map(|d| d.message), Some(MESSAGE.to_string()));
}

// ============================================================================
// Word boundary rule
// ============================================================================

#[test]
fn test_words_alternating_between_planes() {
    let mut pixels = vec![0u8; 2048];
    hide_alternating(&mut pixels, MESSAGE);

    let decoded = decoder_with_min_words(20).decode(&pixels).unwrap();
    assert_eq!(decoded.message, MESSAGE);
    assert_eq!(decoded.planes, vec![0, 2]);
}

#[test]
fn test_mid_word_switch_is_not_followed() {
    // "sleeps" is split: "sle" in plane 0, the rest in plane 2.
    let split = MESSAGE.find("sleeps").unwrap() + 3;
    let (head, tail) = MESSAGE.split_at(split);

    let mut pixels = vec![0u8; 2048];
    hide_at(&mut pixels, head, 0, 0).unwrap();
    hide_at(&mut pixels, tail, head.len() * 8, 2).unwrap();

    assert!(decoder_with_min_words(20).decode(&pixels).is_none());
}

// ============================================================================
// Negative controls
// ============================================================================

#[test]
fn test_zero_stream_has_no_message() {
    let pixels = vec![0u8; 4096];
    assert!(decode(&pixels, dictionary()).is_none());
}

#[test]
fn test_short_nonsense_not_found() {
    for message in ["Hbjkf", "mqwqqq", "0123456789"] {
        let mut pixels = bright_cover(48 * 48 * 4);
        hide(&mut pixels, message).unwrap();
        assert!(decode(&pixels, dictionary()).is_none(), "{} was accepted", message);
    }
}

#[test]
fn test_non_dictionary_words_not_found() {
    for message in ["wa dijfdvfd ylffu mqqeak", "fca kfns"] {
        let mut pixels = vec![0u8; 48 * 48 * 4];
        hide(&mut pixels, message).unwrap();
        assert!(decoder_with_min_words(2).decode(&pixels).is_none(), "{} was accepted", message);
    }
}

#[test]
fn test_solid_rgba_cover_is_fast() {
    use std::time::{Duration, Instant};

    // Every plane reads "UUUU..." at even offsets: letters, never a space.
    let bytes = [0x00u8, 0x07, 0x00, 0xFF].repeat(128 * 128);
    let image = PixelImage::from_raw(128, 128, 4, bytes).unwrap();

    let started = Instant::now();
    assert!(decode(image.bytes(), dictionary()).is_none());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_noise_cover_not_found() {
    let mut pixels = noise_cover(48 * 48 * 4, 7);
    hide(&mut pixels, "Hbjkf").unwrap();
    assert!(decode(&pixels, dictionary()).is_none());
}

// ============================================================================
// Embedder contract
// ============================================================================

#[test]
fn test_capacity_guard() {
    let mut pixels = vec![0u8; 80];
    assert!(hide(&mut pixels, "abcdefghij").is_ok());

    let mut pixels = vec![0u8; 80];
    assert!(matches!(
        hide(&mut pixels, "abcdefghijk"),
        Err(EmbedError::MessageTooLarge { needed: 88, capacity: 80 })
    ));

    // Far beyond 8x the stream length.
    let mut pixels = vec![0u8; 4];
    assert!(matches!(
        hide(&mut pixels, "abcdefg"),
        Err(EmbedError::MessageTooLarge { .. })
    ));
}

#[test]
fn test_bit_order_symmetry() {
    let mut pixels = vec![0u8; 8];
    hide(&mut pixels, "A").unwrap();
    assert_eq!(pixels, vec![0, 1, 0, 0, 0, 0, 0, 1]);

    let planes = extract_planes(&pixels, 3);
    assert_eq!(planes[0].plane(0), Some(&b"A"[..]));
    assert_eq!(candidate_stream(&pixels, 0, 0), b"A".to_vec());
}

#[test]
fn test_hide_only_touches_lsb() {
    let original = noise_cover(1024, 11);
    let mut pixels = original.clone();
    hide(&mut pixels, MESSAGE).unwrap();

    let used = MESSAGE.len() * 8;
    for i in 0..pixels.len() {
        if i < used {
            assert_eq!(pixels[i] & 0xFE, original[i] & 0xFE);
        } else {
            assert_eq!(pixels[i], original[i]);
        }
    }
}

// ============================================================================
// Scorer
// ============================================================================

#[test]
fn test_scorer_boundary() {
    let scorer = Scorer::new(dictionary());

    let half = [vec!["fox"; 10], vec!["zzq"; 10]].concat().join(" ");
    assert!(!scorer.is_valid(&half));

    let over_half = [vec!["fox"; 11], vec!["zzq"; 10]].concat().join(" ");
    assert!(scorer.is_valid(&over_half));

    assert!(!scorer.is_valid(&vec!["fox"; 19].join(" ")));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_png_carrier_roundtrip() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let cover_path = dir.path().join("cover.png");
    let hidden_path = planescan::stego::hidden_path(&cover_path);
    let dict_path = dir.path().join("dictionary.txt");
    std::fs::write(&dict_path, DICTIONARY).unwrap();

    let cover = PixelImage::from_raw(32, 32, 3, bright_cover(32 * 32 * 3)).unwrap();
    cover.save(&cover_path).unwrap();

    let mut image = PixelImage::open(&cover_path).unwrap();
    hide(image.bytes_mut(), MESSAGE).unwrap();
    image.save(&hidden_path).unwrap();

    let loaded = PixelImage::open(&hidden_path).unwrap();
    assert_eq!(loaded.width(), 32);
    assert_eq!(loaded.channels(), 3);

    let dictionary = Arc::new(Dictionary::from_file(&dict_path).unwrap());
    assert_eq!(decode(loaded.bytes(), dictionary), Some(MESSAGE.to_string()));
}

#[test]
fn test_config_file_drives_decoder() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "min_words = 6").unwrap();
    writeln!(file, "lookup_planes = 1").unwrap();

    let config = DecoderConfig::load(file.path()).unwrap();
    let decoder = Decoder::new(dictionary(), config).unwrap();

    let message = "Hello World, what up? For real!";
    let mut pixels = vec![0u8; 1024];
    hide(&mut pixels, message).unwrap();
    assert_eq!(decoder.decode(&pixels).map(|d| d.message), Some(message.to_string()));

    // Plane 1 is outside the single searched plane.
    let mut pixels = vec![0u8; 1024];
    hide_at(&mut pixels, message, 0, 1).unwrap();
    assert!(decoder.decode(&pixels).is_none());
}

#[test]
fn test_empty_dictionary_fails_before_search() {
    assert!(Dictionary::parse("# nothing here\n").is_err());
}
