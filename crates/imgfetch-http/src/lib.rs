//! reqwest implementation of the imgfetch HTTP port.
//!
//! Build a [`ReqwestHttpClient`] from an [`HttpClientConfig`] and hand it to
//! the core services as an `Arc<dyn HttpClientPort>`.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;

// ============================================================================
// Public API
// ============================================================================

pub use client::ReqwestHttpClient;
pub use config::HttpClientConfig;
pub use error::HttpError;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio as _;
#[cfg(test)]
use wiremock as _;
