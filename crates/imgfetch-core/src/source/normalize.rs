//! URL canonicalization.
//!
//! The normalized string is both the fetch target and the cache key, so the
//! same image referenced in slightly different spellings maps to one file.

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::UrlNormalization;

/// Why a source could not be normalized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("source is empty")]
    Empty,

    #[error("invalid URL '{source_str}': {reason}")]
    Parse { source_str: String, reason: String },
}

/// Canonicalize a raw image source.
///
/// - trims whitespace and prepends the default protocol when none is given
/// - lowercases scheme and host, drops default ports and credentials
/// - optionally forces `https`
/// - strips a leading `www.`, `utm_*` parameters and trailing slashes
/// - sorts the remaining query parameters
///
/// `data:` URLs and local paths (`/img.png`, `./img.png`, and `//host/img.png`
/// when protocol normalization is off) are returned trimmed but otherwise
/// untouched; classification treats them as local.
pub fn normalize(raw: &str, options: &UrlNormalization) -> Result<String, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::Empty);
    }

    if trimmed.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:"))
        || is_relative_path(trimmed)
        || (trimmed.starts_with("//") && !options.normalize_protocol)
    {
        return Ok(trimmed.to_string());
    }

    let with_protocol = if let Some(rest) = trimmed.strip_prefix("//") {
        format!("{}//{rest}", options.default_protocol)
    } else if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}//{trimmed}", options.default_protocol)
    };

    let mut url = Url::parse(&with_protocol).map_err(|e| NormalizeError::Parse {
        source_str: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
        return Err(NormalizeError::Parse {
            source_str: trimmed.to_string(),
            reason: "missing host".to_string(),
        });
    }

    // Scheme and credential setters only fail for URLs without a host
    if options.force_https && url.scheme() == "http" && url.set_scheme("https").is_err() {
        debug!(source = trimmed, "Could not switch scheme to https");
    }
    if url.set_username("").is_err() || url.set_password(None).is_err() {
        debug!(source = trimmed, "Could not strip credentials");
    }

    if let Some(stripped) = url.host_str().and_then(strip_www) {
        url.set_host(Some(&stripped))
            .map_err(|e| NormalizeError::Parse {
                source_str: trimmed.to_string(),
                reason: e.to_string(),
            })?;
    }

    normalize_query(&mut url);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let cleaned = path.trim_end_matches('/').to_string();
        url.set_path(&cleaned);
    }

    let mut out = url.to_string();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        out.pop();
    }
    Ok(out)
}

/// `/img.png`, `./img.png` and `../img.png` are paths, `//host` is not.
fn is_relative_path(s: &str) -> bool {
    if s.starts_with("//") {
        return false;
    }
    let after_dots = s.trim_start_matches('.');
    after_dots.starts_with('/') || after_dots.starts_with('\\')
}

/// True when the string starts with `word://`.
fn has_scheme(s: &str) -> bool {
    s.find("://").is_some_and(|idx| {
        idx > 0
            && s[..idx]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_'))
    })
}

fn strip_www(host: &str) -> Option<String> {
    let rest = host.strip_prefix("www.")?;
    // Keep `www.com` and `www.www.example.com`-style hosts intact
    if rest.starts_with("www.") || !rest.contains('.') {
        return None;
    }
    Some(rest.to_string())
}

fn normalize_query(url: &mut Url) {
    if url.query().is_none() {
        return;
    }

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !key.to_ascii_lowercase().starts_with("utm_"))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if pairs.is_empty() {
        url.set_query(None);
        return;
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    url.query_pairs_mut().clear().extend_pairs(pairs);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> UrlNormalization {
        UrlNormalization::default()
    }

    #[test]
    fn adds_default_protocol() {
        assert_eq!(
            normalize("example.com/img.png", &defaults()).unwrap(),
            "http://example.com/img.png"
        );

        let https = UrlNormalization {
            default_protocol: "https:".to_string(),
            ..defaults()
        };
        assert_eq!(
            normalize("example.com/img.png", &https).unwrap(),
            "https://example.com/img.png"
        );
    }

    #[test]
    fn protocol_relative_urls() {
        assert_eq!(
            normalize("//cdn.example.com/a.jpg", &defaults()).unwrap(),
            "http://cdn.example.com/a.jpg"
        );

        let disabled = UrlNormalization {
            normalize_protocol: false,
            ..defaults()
        };
        assert_eq!(
            normalize(" //cdn.example.com/a.jpg", &disabled).unwrap(),
            "//cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn lowercases_scheme_and_host() {
        assert_eq!(
            normalize("HTTPS://Example.COM/Img.PNG", &defaults()).unwrap(),
            "https://example.com/Img.PNG"
        );
    }

    #[test]
    fn forces_https() {
        let force = UrlNormalization {
            force_https: true,
            ..defaults()
        };
        assert_eq!(
            normalize("http://example.com/a.png", &force).unwrap(),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn strips_www_credentials_and_default_port() {
        assert_eq!(
            normalize("http://user:pw@www.example.com:80/a.png", &defaults()).unwrap(),
            "http://example.com/a.png"
        );
        assert_eq!(
            normalize("http://www.com/a.png", &defaults()).unwrap(),
            "http://www.com/a.png"
        );
    }

    #[test]
    fn cleans_query_and_trailing_slash() {
        assert_eq!(
            normalize(
                "https://example.com/img/?w=200&utm_source=x&a=1",
                &defaults()
            )
            .unwrap(),
            "https://example.com/img?a=1&w=200"
        );
        assert_eq!(
            normalize("https://example.com/?utm_medium=x", &defaults()).unwrap(),
            "https://example.com"
        );
        assert_eq!(
            normalize("https://example.com/", &defaults()).unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn keeps_fragment() {
        assert_eq!(
            normalize("https://example.com/a.svg#icon", &defaults()).unwrap(),
            "https://example.com/a.svg#icon"
        );
    }

    #[test]
    fn local_paths_pass_through() {
        for raw in ["/images/a.png", "./a.png", "../a.png"] {
            assert_eq!(normalize(raw, &defaults()).unwrap(), raw);
        }
        assert_eq!(normalize("  /a.png\n", &defaults()).unwrap(), "/a.png");
    }

    #[test]
    fn empty_and_garbage_inputs_fail() {
        assert_eq!(normalize("", &defaults()), Err(NormalizeError::Empty));
        assert_eq!(normalize("   ", &defaults()), Err(NormalizeError::Empty));
        assert!(matches!(
            normalize("http://", &defaults()),
            Err(NormalizeError::Parse { .. })
        ));
        assert!(matches!(
            normalize("http://exa mple.com/a.png", &defaults()),
            Err(NormalizeError::Parse { .. })
        ));
    }

    #[test]
    fn data_urls_untouched() {
        let data = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(normalize(data, &defaults()).unwrap(), data);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize("Example.com/a/b/?z=1&y=2", &defaults()).unwrap();
        let twice = normalize(&once, &defaults()).unwrap();
        assert_eq!(once, twice);
    }
}
