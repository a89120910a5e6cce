//! Image source handling: normalization and local/remote classification.
//!
//! A source string is first canonicalized (`normalize`), then classified
//! (`classify`). Only remote sources ever reach the network.

mod locality;
mod normalize;

pub use locality::{SourceClass, classify};
pub use normalize::{NormalizeError, normalize};
