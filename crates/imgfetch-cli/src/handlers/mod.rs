//! Command handlers.
//!
//! Handlers are thin: they read input files, resolve options into core
//! configuration, call the core service and report results.

pub mod check_config;
pub mod run;
