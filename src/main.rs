//! planescan - hide text in image bit planes and find it again
//!
//! `hide` writes a message into bit 0 of the pixel bytes. `decode` searches
//! the low bit planes at every byte alignment and keeps the candidate that
//! reads like text.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;

mod commands;

use commands::{CommandExecutor, DecodeCommand, HideCommand};

/// planescan - hide text in image bit planes and find it again
#[derive(Parser)]
#[command(name = "planescan")]
#[command(version)]
#[command(about = "Hide a message in image LSBs and recover it without knowing plane or alignment")]
#[command(long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message in an image
    Hide(HideCommand),

    /// Find a hidden message in an image
    Decode(DecodeCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("Failed to initialize logger")?;

    match cli.command {
        Commands::Hide(cmd) => cmd.execute(),
        Commands::Decode(cmd) => cmd.execute(),
    }
}
