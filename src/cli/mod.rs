pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Largest FB2 input accepted by default, in bytes (50 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "fb2epub",
    version,
    about = "Convert FictionBook 2.0 documents into EPUB 3 books"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output and debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an FB2 file to EPUB
    Convert {
        /// Path to the FB2 file
        input: PathBuf,
        /// Output EPUB path (default: slugified title next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reject inputs larger than this many bytes
        #[arg(long, env = "FB2EPUB_MAX_SIZE", default_value_t = DEFAULT_MAX_SIZE)]
        max_size: u64,
    },
    /// Show metadata and structure of an FB2 file
    Info {
        /// Path to the FB2 file
        input: PathBuf,
    },
}
