//! Loading the options file.
//!
//! The file holds either a single options object or an array of them, one per
//! collection to process.

use std::path::Path;

use imgfetch_core::FetchOptions;
use serde_json::Value;

use crate::error::CliError;

/// Read and parse an options file.
pub async fn load_options(path: &Path) -> Result<Vec<FetchOptions>, CliError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    parse_options(&raw).map_err(|e| match e {
        CliError::Config(msg) => CliError::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Parse options JSON: one object or an array of objects.
pub fn parse_options(raw: &str) -> Result<Vec<FetchOptions>, CliError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CliError::Config(format!("invalid JSON: {e}")))?;

    let entries = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => {
            return Err(CliError::Config(format!(
                "expected an object or an array of objects, got {}",
                kind(&other)
            )));
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry)
                .map_err(|e| CliError::Config(format!("entry {index}: {e}")))
        })
        .collect()
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_object() {
        let options = parse_options(r#"{"typeName": "Post", "sourceField": "image"}"#).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].type_name.as_deref(), Some("Post"));
        assert_eq!(options[0].source_field.as_deref(), Some("image"));
    }

    #[test]
    fn test_array_of_entries() {
        let options = parse_options(
            r#"[
                {"typeName": "Post", "sourceField": "image", "cache": false},
                {"typeName": "Author", "sourceField": "avatar", "targetPath": "static/avatars"}
            ]"#,
        )
        .unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].cache, Some(false));
        assert_eq!(options[1].target_path.as_deref(), Some("static/avatars"));
    }

    #[test]
    fn test_missing_keys_are_left_for_validation() {
        let options = parse_options("{}").unwrap();
        assert_eq!(options, vec![FetchOptions::default()]);
    }

    #[test]
    fn test_wrong_shape() {
        let err = parse_options(r#""Post""#).unwrap_err();
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_wrong_field_type_names_entry() {
        let err = parse_options(r#"[{}, {"cache": "yes"}]"#).unwrap_err();
        assert!(err.to_string().contains("entry 1"));
    }
}
