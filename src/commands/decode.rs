//! Decode command - find a hidden message in an image.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use planescan::{Decoder, DecoderConfig, Dictionary, PixelImage, DEFAULT_DICTIONARY_FILE, DEFAULT_OUTPUT_FILE};

use super::CommandExecutor;

/// Find a hidden message in an image.
///
/// The bit plane and byte alignment of the message are unknown; every
/// combination of the low planes and the 8 alignments is searched, and a
/// candidate is accepted when enough of its words are in the dictionary.
///
/// The message is printed and written to the output file. Exits with an
/// error if no message is found.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Path to the image to search
    pub image: PathBuf,

    /// Word list, one word per line (# starts a comment)
    #[arg(short, long, default_value = DEFAULT_DICTIONARY_FILE)]
    pub dictionary: PathBuf,

    /// Decoder configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File to write the recovered message to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self) -> Result<()> {
        let config = match &self.config {
            Some(path) => DecoderConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => DecoderConfig::default(),
        };

        let dictionary = Dictionary::from_file(&self.dictionary).with_context(|| {
            format!("Failed to load dictionary from {}", self.dictionary.display())
        })?;
        log::info!("Loaded dictionary with {} words", dictionary.len());

        let decoder = Decoder::new(Arc::new(dictionary), config).context("Invalid decoder config")?;

        let image = PixelImage::open(&self.image)
            .with_context(|| format!("Failed to read image from {}", self.image.display()))?;
        log::info!(
            "Searching {}x{} image with {} channels ({} bytes)",
            image.width(),
            image.height(),
            image.channels(),
            image.bytes().len()
        );

        let Some(decoded) = decoder.decode(image.bytes()) else {
            anyhow::bail!("Could not find a message in {}", self.image.display());
        };

        log::info!(
            "Found {} chars at byte {} (offset {}, planes {:?})",
            decoded.message.len(),
            decoded.byte_start,
            decoded.offset,
            decoded.planes
        );

        std::fs::write(&self.output, &decoded.message)
            .with_context(|| format!("Failed to write message to {}", self.output.display()))?;

        println!("{}", decoded.message);

        Ok(())
    }
}
