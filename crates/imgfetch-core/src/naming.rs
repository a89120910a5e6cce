//! Deterministic target paths for downloaded images.
//!
//! In hashed mode (the default) every normalized source maps to
//! `<target>/<sha256 hex><ext>`; in original-name mode the remote directory
//! structure and basename are kept under the target directory.

use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};
use url::Url;

use crate::config::FetchConfig;

/// The `{dir, name, ext}` split of a URL path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPathParts {
    /// Directory part, `/` for files at the root.
    pub dir: String,
    /// Basename without extension.
    pub name: String,
    /// Extension including the leading dot, or empty.
    pub ext: String,
}

impl UrlPathParts {
    pub fn from_url(url: &Url) -> Self {
        Self::parse(url.path())
    }

    /// Split a `/`-separated path. The extension starts at the last dot of the
    /// basename, unless that dot is its first or last character.
    pub fn parse(pathname: &str) -> Self {
        let trimmed = pathname.trim_end_matches('/');
        let (dir, base) = match trimmed.rfind('/') {
            Some(0) => ("/", &trimmed[1..]),
            Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
            None if pathname.starts_with('/') => ("/", trimmed),
            None => ("", trimmed),
        };

        let (name, ext) = match base.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < base.len() => (&base[..idx], &base[idx..]),
            _ => (base, ""),
        };

        Self {
            dir: dir.to_string(),
            name: name.to_string(),
            ext: ext.to_string(),
        }
    }
}

/// Where a source is stored and how the content tree refers to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    /// Filesystem path of the downloaded file.
    pub path: PathBuf,
    /// `path` relative to the configured source root, `/`-separated.
    pub relative: String,
}

/// Lowercase hex SHA-256 of the normalized source (64 characters).
pub fn source_digest(normalized: &str) -> String {
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Compute the target file for a normalized source.
///
/// `ext` is the extension to use (from the URL or the declared content type).
pub fn target_file(
    config: &FetchConfig,
    normalized: &str,
    parts: &UrlPathParts,
    ext: &str,
) -> TargetFile {
    let mut folder = config.target_dir();
    let stem = if config.original && !parts.name.is_empty() {
        for segment in parts.dir.split('/') {
            if !matches!(segment, "" | "." | "..") {
                folder.push(segment);
            }
        }
        parts.name.clone()
    } else {
        source_digest(normalized)
    };

    let path = folder.join(format!("{stem}{ext}"));
    let relative = relative_path(&config.source_dir(), &path);
    TargetFile { path, relative }
}

/// Lexical relative path from `base` to `target`, `/`-separated.
///
/// Falls back to `target` itself when the two do not share a root.
pub fn relative_path(base: &Path, target: &Path) -> String {
    let base = lexical_components(base);
    let target_components = lexical_components(target);

    let same_root = base.first().map(is_root_like) == target_components.first().map(is_root_like)
        || base.is_empty()
        || target_components.is_empty();
    if !same_root {
        return target.to_string_lossy().replace('\\', "/");
    }

    let common = base
        .iter()
        .zip(&target_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat_n("..".to_string(), base.len() - common).collect();
    parts.extend(
        target_components[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

fn is_root_like(component: &Component<'_>) -> bool {
    matches!(component, Component::Prefix(_) | Component::RootDir)
}

/// Components with `.` removed and `..` applied.
fn lexical_components(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.last(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
