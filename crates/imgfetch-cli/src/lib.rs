//! Command-line host for the imgfetch pipeline.
//!
//! Reads a JSON content file and one or more option entries, downloads the
//! remote images each entry points at and writes the rewritten content back.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings
#[cfg(test)]
use bytes as _;
#[cfg(test)]
use futures_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use url as _;

// Used by the binary only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod content_store;
pub mod error;
pub mod handlers;
pub mod options;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use content_store::JsonFileContentStore;
pub use error::CliError;
pub use parser::Cli;
