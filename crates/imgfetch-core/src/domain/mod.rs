//! Domain types shared by the resolver, the fetcher and the adapters.
//!
//! These are pure data types with no I/O.

mod content;
mod outcome;

pub use content::{ContentTree, FieldPath, FieldPathError};
pub use outcome::{FetchOutcome, FetchSummary, OutcomeKind};
