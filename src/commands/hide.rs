//! Hide command - write a message into the low bits of an image.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use planescan::stego::{capacity_bits, hidden_path};
use planescan::text::is_message_text;
use planescan::{hide, PixelImage};

use super::CommandExecutor;

/// Hide a message in the least significant bit of each pixel byte.
///
/// The message is written bit by bit, in pixel order (left to right, top to
/// bottom, channel by channel), starting at the first byte. The result is
/// always saved as PNG so the low bits survive.
#[derive(Args, Debug)]
pub struct HideCommand {
    /// Path to the cover image (PNG or BMP)
    pub image: PathBuf,

    /// Message to hide (reads from stdin if not provided)
    pub message: Option<String>,

    /// Output path (default: <image stem>_hidden.png next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for HideCommand {
    fn execute(&self) -> Result<()> {
        let message = match &self.message {
            Some(m) => m.clone(),
            None => {
                eprintln!("Reading message from stdin (Ctrl+D to finish):");
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read message from stdin")?;
                buffer.trim().to_string()
            }
        };

        if message.is_empty() {
            anyhow::bail!("Message cannot be empty");
        }

        if !is_message_text(&message) {
            log::warn!(
                "Message contains characters other than letters, spaces and , . ! ? - it will not be recoverable by decode"
            );
        }

        let mut image = PixelImage::open(&self.image)
            .with_context(|| format!("Failed to read image from {}", self.image.display()))?;

        log::info!(
            "Loaded {}x{} image with {} channels (capacity {} bits)",
            image.width(),
            image.height(),
            image.channels(),
            capacity_bits(image.bytes().len(), 0)
        );

        hide(image.bytes_mut(), &message).context("Failed to hide message")?;

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| hidden_path(&self.image));
        image
            .save(&output)
            .with_context(|| format!("Failed to save image to {}", output.display()))?;

        log::info!("Hid {} bytes ({} bits)", message.len(), message.len() * 8);
        println!("{}", output.display());

        Ok(())
    }
}
