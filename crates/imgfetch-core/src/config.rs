//! User options and the resolved fetch configuration.
//!
//! `FetchOptions` mirrors what a user writes in the options file: every key is
//! optional so that missing values can be reported all at once. Validation
//! turns it into an immutable `FetchConfig` with defaults applied.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{FieldPath, FieldPathError};

/// Default directory (relative to the project root) for downloaded images.
pub const DEFAULT_TARGET_PATH: &str = "src/assets/remoteImages";

/// Default directory (relative to the project root) that returned paths are relative to.
pub const DEFAULT_SOURCE_ROOT: &str = "src";

/// Default protocol prepended to protocol-less sources.
pub const DEFAULT_PROTOCOL: &str = "http:";

/// Raw options as supplied by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchOptions {
    /// Collection whose records are scanned.
    pub type_name: Option<String>,
    /// Dotted path to the image field inside each record.
    pub source_field: Option<String>,
    /// Reuse files that already exist at the computed path.
    pub cache: Option<bool>,
    /// Keep the remote file name and directory instead of a hashed name.
    pub original: Option<bool>,
    /// Download directory, relative to the project root.
    pub target_path: Option<String>,
    /// Directory the returned paths are made relative to.
    pub source_root: Option<String>,
    /// Treat loopback and private network hosts as downloadable.
    pub download_from_local_network: Option<bool>,
    /// Value written back when a remote image cannot be fetched.
    pub fallback_image: Option<String>,
    pub force_https: Option<bool>,
    pub normalize_protocol: Option<bool>,
    pub default_protocol: Option<String>,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} can't be blank")]
    Blank { field: &'static str },

    #[error("sourceField is not a valid field path: {0}")]
    SourceField(#[from] FieldPathError),

    #[error("defaultProtocol must be \"http:\" or \"https:\", got \"{0}\"")]
    DefaultProtocol(String),

    #[error("{}", join_problems(.0))]
    Invalid(Vec<ConfigError>),
}

impl ConfigError {
    /// Flattened list of individual problems.
    pub fn problems(&self) -> Vec<&Self> {
        match self {
            Self::Invalid(errors) => errors.iter().flat_map(Self::problems).collect(),
            other => vec![other],
        }
    }
}

fn join_problems(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// How raw sources are canonicalized before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlNormalization {
    /// Rewrite `http` URLs to `https`.
    pub force_https: bool,
    /// Prefix protocol-relative (`//host/...`) sources with the default protocol.
    pub normalize_protocol: bool,
    /// Protocol used for sources without one, `http:` or `https:`.
    pub default_protocol: String,
}

impl Default for UrlNormalization {
    fn default() -> Self {
        Self {
            force_https: false,
            normalize_protocol: true,
            default_protocol: DEFAULT_PROTOCOL.to_string(),
        }
    }
}

/// Immutable configuration for one collection, resolved once per build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub type_name: String,
    pub source_field: FieldPath,
    pub cache: bool,
    pub original: bool,
    pub target_path: PathBuf,
    pub download_from_local_network: bool,
    pub fallback_image: Option<String>,
    pub normalization: UrlNormalization,
    /// Root every relative directory is resolved against.
    pub project_root: PathBuf,
    /// Returned paths are relative to `project_root/source_root`.
    pub source_root: PathBuf,
}

impl FetchConfig {
    /// Create a configuration with default settings.
    pub fn new(type_name: impl Into<String>, source_field: FieldPath) -> Self {
        Self {
            type_name: type_name.into(),
            source_field,
            cache: true,
            original: false,
            target_path: PathBuf::from(DEFAULT_TARGET_PATH),
            download_from_local_network: false,
            fallback_image: None,
            normalization: UrlNormalization::default(),
            project_root: PathBuf::from("."),
            source_root: PathBuf::from(DEFAULT_SOURCE_ROOT),
        }
    }

    /// Validate user options and apply defaults.
    pub fn from_options(options: &FetchOptions, project_root: &Path) -> Result<Self, ConfigError> {
        let mut problems = validate_options(options);
        if !problems.is_empty() {
            return Err(if problems.len() == 1 {
                problems.remove(0)
            } else {
                ConfigError::Invalid(problems)
            });
        }

        // Validation guarantees both are present and parseable
        let type_name = options.type_name.clone().unwrap_or_default();
        let source_field = FieldPath::parse(options.source_field.as_deref().unwrap_or_default())?;

        let mut config = Self::new(type_name, source_field)
            .with_project_root(project_root)
            .with_cache(options.cache.unwrap_or(true))
            .with_original(options.original.unwrap_or(false))
            .with_local_network(options.download_from_local_network.unwrap_or(false));
        if let Some(fallback) = &options.fallback_image {
            config = config.with_fallback_image(fallback.clone());
        }
        if let Some(target) = &options.target_path {
            config = config.with_target_path(target);
        }
        if let Some(source_root) = &options.source_root {
            config.source_root = PathBuf::from(source_root);
        }
        Ok(config.with_normalization(UrlNormalization {
            force_https: options.force_https.unwrap_or(false),
            normalize_protocol: options.normalize_protocol.unwrap_or(true),
            default_protocol: options
                .default_protocol
                .as_deref()
                .map_or_else(|| DEFAULT_PROTOCOL.to_string(), canonical_protocol),
        }))
    }

    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    #[must_use]
    pub fn with_target_path(mut self, target: impl Into<PathBuf>) -> Self {
        self.target_path = target.into();
        self
    }

    #[must_use]
    pub const fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub const fn with_original(mut self, original: bool) -> Self {
        self.original = original;
        self
    }

    #[must_use]
    pub const fn with_local_network(mut self, allow: bool) -> Self {
        self.download_from_local_network = allow;
        self
    }

    #[must_use]
    pub fn with_fallback_image(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_image = Some(fallback.into());
        self
    }

    #[must_use]
    pub fn with_normalization(mut self, normalization: UrlNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Absolute (or project-relative) directory downloads land in.
    pub fn target_dir(&self) -> PathBuf {
        self.project_root.join(&self.target_path)
    }

    /// Directory returned paths are relative to.
    pub fn source_dir(&self) -> PathBuf {
        self.project_root.join(&self.source_root)
    }
}

/// Check user options, collecting every problem instead of stopping at the first.
///
/// An empty result means the options are valid.
pub fn validate_options(options: &FetchOptions) -> Vec<ConfigError> {
    let mut problems = Vec::new();

    if is_blank(options.type_name.as_deref()) {
        problems.push(ConfigError::Blank { field: "typeName" });
    }

    match options.source_field.as_deref() {
        field if is_blank(field) => problems.push(ConfigError::Blank {
            field: "sourceField",
        }),
        Some(field) => {
            if let Err(e) = FieldPath::parse(field) {
                problems.push(ConfigError::SourceField(e));
            }
        }
        None => {}
    }

    if options.target_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
        problems.push(ConfigError::Blank {
            field: "targetPath",
        });
    }

    if let Some(protocol) = options.default_protocol.as_deref() {
        if !matches!(canonical_protocol(protocol).as_str(), "http:" | "https:") {
            problems.push(ConfigError::DefaultProtocol(protocol.to_string()));
        }
    }

    problems
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// `https` and `HTTPS:` both become `https:`.
fn canonical_protocol(protocol: &str) -> String {
    let lower = protocol.trim().to_ascii_lowercase();
    if lower.ends_with(':') {
        lower
    } else {
        format!("{lower}:")
    }
}
