//! Core services.
//!
//! - `PathResolver` walks a content tree and rewrites image fields
//! - `ImageFetcher` turns image sources into local paths
//! - `RemoteImageService` wires both to a content store for one collection

mod error;
mod image_fetcher;
mod path_resolver;
mod remote_images;

pub use error::FetchError;
pub use image_fetcher::ImageFetcher;
pub use path_resolver::{LeafTransform, PathResolver, TraversalReport};
pub use remote_images::{CollectionReport, RemoteImageService};
