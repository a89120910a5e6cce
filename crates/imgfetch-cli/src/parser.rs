//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Download remote images referenced by content files.
#[derive(Parser)]
#[command(name = "imgfetch")]
#[command(about = "Download remote images referenced in content and rewrite the references")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
