//! Content trees and the field paths that address image fields inside them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An untyped, arbitrarily nested content record tree.
///
/// Owned by the content store; the resolver takes it by value and hands the
/// rewritten tree back.
pub type ContentTree = serde_json::Value;

/// Errors produced while parsing a [`FieldPath`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldPathError {
    #[error("Field path cannot be empty")]
    Empty,

    #[error("Field path '{path}' contains an empty segment")]
    EmptySegment { path: String },
}

/// Ordered object keys leading to an image field.
///
/// Arrays met along the way are traversed implicitly and never consume a
/// segment, so `seo.images` matches `{"seo": [{"images": ...}, ...]}` as well
/// as `{"seo": {"images": ...}}`.
///
/// Invariant: at least one segment, and no segment is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path such as `seo.images`.
    pub fn parse(dotted: &str) -> Result<Self, FieldPathError> {
        let trimmed = dotted.trim();
        if trimmed.is_empty() {
            return Err(FieldPathError::Empty);
        }

        Self::from_segments(trimmed.split('.'))
    }

    /// Build a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, FieldPathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(FieldPathError::Empty);
        }
        if segments.iter().any(String::is_empty) {
            return Err(FieldPathError::EmptySegment {
                path: segments.join("."),
            });
        }
        Ok(Self { segments })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = FieldPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
