//! CLI-specific error types and mappings.
//!
//! Maps core and adapter errors to exit codes and user-facing messages.

use imgfetch_core::{ConfigError, ContentStoreError};
use imgfetch_http::HttpError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or input file shape error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content file could not be read, parsed or written.
    #[error("Content error: {0}")]
    Content(String),

    /// HTTP client could not be set up.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Content(_) => 65,  // EX_DATAERR
            Self::Http(_) => 69,     // EX_UNAVAILABLE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<ContentStoreError> for CliError {
    fn from(err: ContentStoreError) -> Self {
        match err {
            ContentStoreError::Io(msg) => Self::Io(msg),
            other => Self::Content(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<HttpError> for CliError {
    fn from(err: HttpError) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
