//! Field-path driven traversal of content trees.
//!
//! Objects consume one path segment per level; arrays are transparent and
//! every element is visited at the same segment index. When the path is
//! exhausted the node reached is the leaf: a string or an array of strings
//! is handed to the transform and the results are stored in its place.

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::domain::{ContentTree, FieldPath};

/// Async replacement function applied to every located leaf.
///
/// Must return exactly one value per input, in input order.
#[async_trait]
pub trait LeafTransform: Send + Sync {
    async fn transform(&self, sources: Vec<String>) -> Vec<String>;
}

/// Counters for one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalReport {
    /// Leaves found at the end of the path, of any type.
    pub leaves: usize,
    /// Strings handed to the transform.
    pub sources: usize,
    /// Leaves (or leaf array elements) that were not strings.
    pub unsupported: usize,
}

/// Locates and rewrites the leaves addressed by a [`FieldPath`].
#[derive(Debug, Clone)]
pub struct PathResolver {
    path: FieldPath,
}

impl PathResolver {
    pub const fn new(path: FieldPath) -> Self {
        Self { path }
    }

    /// Rewrite every leaf reachable from `root` and return the new tree.
    ///
    /// Missing keys end the walk silently. Array elements are processed one
    /// after another.
    pub async fn traverse_and_replace(
        &self,
        root: ContentTree,
        transform: &dyn LeafTransform,
    ) -> (ContentTree, TraversalReport) {
        let mut report = TraversalReport::default();
        let tree = self.visit(root, 0, transform, &mut report).await;
        (tree, report)
    }

    fn visit<'a>(
        &'a self,
        node: Value,
        depth: usize,
        transform: &'a dyn LeafTransform,
        report: &'a mut TraversalReport,
    ) -> BoxFuture<'a, Value> {
        async move {
            if depth == self.path.len() {
                return self.replace_leaf(node, transform, report).await;
            }

            match node {
                Value::Array(items) => {
                    let mut rewritten = Vec::with_capacity(items.len());
                    for item in items {
                        rewritten.push(self.visit(item, depth, transform, report).await);
                    }
                    Value::Array(rewritten)
                }
                Value::Object(mut map) => {
                    let key = self.path.segment(depth).unwrap_or_default();
                    if let Some(child) = map.get_mut(key) {
                        let taken = child.take();
                        *child = self.visit(taken, depth + 1, transform, report).await;
                    } else {
                        trace!(field = %key, "Field absent, skipping");
                    }
                    Value::Object(map)
                }
                other => {
                    debug!(
                        path = %self.path,
                        depth,
                        kind = value_kind(&other),
                        "Cannot descend into scalar, skipping"
                    );
                    other
                }
            }
        }
        .boxed()
    }

    async fn replace_leaf(
        &self,
        leaf: Value,
        transform: &dyn LeafTransform,
        report: &mut TraversalReport,
    ) -> Value {
        report.leaves += 1;

        match leaf {
            Value::String(source) => {
                report.sources += 1;
                let mut results = transform.transform(vec![source.clone()]).await;
                match (results.pop(), results.is_empty()) {
                    (Some(replacement), true) => Value::String(replacement),
                    _ => {
                        warn!(path = %self.path, "Transform returned wrong number of values, keeping leaf");
                        Value::String(source)
                    }
                }
            }
            Value::Array(mut items) => {
                let positions: Vec<usize> = items
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, item)| item.is_string().then_some(idx))
                    .collect();

                let skipped = items.len() - positions.len();
                if skipped > 0 {
                    report.unsupported += skipped;
                    warn!(path = %self.path, skipped, "Ignoring non-string entries in image array");
                }
                if positions.is_empty() {
                    return Value::Array(items);
                }

                let sources: Vec<String> = positions
                    .iter()
                    .filter_map(|&idx| items[idx].as_str().map(str::to_string))
                    .collect();
                report.sources += sources.len();

                let results = transform.transform(sources).await;
                if results.len() != positions.len() {
                    warn!(
                        path = %self.path,
                        expected = positions.len(),
                        got = results.len(),
                        "Transform returned wrong number of values, keeping leaf"
                    );
                    return Value::Array(items);
                }

                for (idx, replacement) in positions.into_iter().zip(results) {
                    items[idx] = Value::String(replacement);
                }
                Value::Array(items)
            }
            other => {
                report.unsupported += 1;
                warn!(
                    path = %self.path,
                    kind = value_kind(&other),
                    "Unrecognised field type, leaving it untouched"
                );
                other
            }
        }
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
