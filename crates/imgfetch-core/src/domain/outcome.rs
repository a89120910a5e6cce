//! Per-source results of the fetch pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of resolving one image source.
///
/// Every variant carries the string that is written back into the content
/// tree in place of the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// The source is not a fetchable remote URL; the normalized value is kept.
    LocalPathUnchanged(String),
    /// A file for this source already existed; relative path to it.
    CachedLocalPath(String),
    /// The source was downloaded; relative path to the new file.
    DownloadedLocalPath(String),
    /// Metadata lookup or download failed; configured fallback or the source.
    FallbackValue(String),
    /// The source could not be normalized; the raw input is kept.
    OriginalValueUnchanged(String),
}

impl FetchOutcome {
    /// The value to store in the content tree.
    pub fn into_value(self) -> String {
        match self {
            Self::LocalPathUnchanged(v)
            | Self::CachedLocalPath(v)
            | Self::DownloadedLocalPath(v)
            | Self::FallbackValue(v)
            | Self::OriginalValueUnchanged(v) => v,
        }
    }

    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::LocalPathUnchanged(_) => OutcomeKind::Local,
            Self::CachedLocalPath(_) => OutcomeKind::Cached,
            Self::DownloadedLocalPath(_) => OutcomeKind::Downloaded,
            Self::FallbackValue(_) => OutcomeKind::Fallback,
            Self::OriginalValueUnchanged(_) => OutcomeKind::Unchanged,
        }
    }
}

/// Discriminant of [`FetchOutcome`], used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Local,
    Cached,
    Downloaded,
    Fallback,
    Unchanged,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Local => "local",
            Self::Cached => "cached",
            Self::Downloaded => "downloaded",
            Self::Fallback => "fallback",
            Self::Unchanged => "unchanged",
        };
        f.write_str(s)
    }
}

/// Outcome counts for one collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSummary {
    pub local: usize,
    pub cached: usize,
    pub downloaded: usize,
    pub fallback: usize,
    pub unchanged: usize,
}

impl FetchSummary {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        match outcome.kind() {
            OutcomeKind::Local => self.local += 1,
            OutcomeKind::Cached => self.cached += 1,
            OutcomeKind::Downloaded => self.downloaded += 1,
            OutcomeKind::Fallback => self.fallback += 1,
            OutcomeKind::Unchanged => self.unchanged += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.local += other.local;
        self.cached += other.cached;
        self.downloaded += other.downloaded;
        self.fallback += other.fallback;
        self.unchanged += other.unchanged;
    }

    pub const fn total(&self) -> usize {
        self.local + self.cached + self.downloaded + self.fallback + self.unchanged
    }

    /// Sources that did not end up as a local file or a kept local reference.
    pub const fn failed(&self) -> usize {
        self.fallback + self.unchanged
    }
}

impl<'a> FromIterator<&'a FetchOutcome> for FetchSummary {
    fn from_iter<T: IntoIterator<Item = &'a FetchOutcome>>(iter: T) -> Self {
        let mut summary = Self::default();
        for outcome in iter {
            summary.record(outcome);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_shared_across_variants() {
        let outcomes = [
            FetchOutcome::LocalPathUnchanged("a".into()),
            FetchOutcome::CachedLocalPath("a".into()),
            FetchOutcome::DownloadedLocalPath("a".into()),
            FetchOutcome::FallbackValue("a".into()),
            FetchOutcome::OriginalValueUnchanged("a".into()),
        ];
        for outcome in outcomes {
            assert_eq!(outcome.into_value(), "a");
        }
    }

    #[test]
    fn summary_counts_kinds() {
        let outcomes = vec![
            FetchOutcome::DownloadedLocalPath("a".into()),
            FetchOutcome::DownloadedLocalPath("b".into()),
            FetchOutcome::CachedLocalPath("c".into()),
            FetchOutcome::FallbackValue("d".into()),
        ];
        let summary: FetchSummary = outcomes.iter().collect();
        assert_eq!(summary.downloaded, 2);
        assert_eq!(summary.cached, 1);
        assert_eq!(summary.fallback, 1);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.failed(), 1);

        let mut merged = FetchSummary::default();
        merged.merge(&summary);
        merged.merge(&summary);
        assert_eq!(merged.total(), 8);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(FetchOutcome::CachedLocalPath("p.png".into())).unwrap();
        assert_eq!(json["kind"], "cached_local_path");
        assert_eq!(json["value"], "p.png");
        assert_eq!(OutcomeKind::Fallback.to_string(), "fallback");
    }
}
