//! Check-config command handler.
//!
//! Validates every entry of an options file and prints what each resolves to.

use std::path::Path;

use imgfetch_core::{FetchConfig, FetchOptions};

use crate::error::CliError;
use crate::options::load_options;

/// Execute the check-config command.
///
/// Fails with a configuration error if any entry is invalid.
pub async fn execute(config: &Path, project_root: &Path) -> Result<(), CliError> {
    let entries = load_options(config).await?;
    let lines = describe_entries(&entries, project_root);
    for line in &lines.output {
        println!("{line}");
    }

    if lines.invalid > 0 {
        return Err(CliError::Config(format!(
            "{} of {} entries are invalid",
            lines.invalid,
            entries.len()
        )));
    }
    Ok(())
}

struct Described {
    output: Vec<String>,
    invalid: usize,
}

fn describe_entries(entries: &[FetchOptions], project_root: &Path) -> Described {
    let mut output = Vec::new();
    let mut invalid = 0;

    for (index, options) in entries.iter().enumerate() {
        match FetchConfig::from_options(options, project_root) {
            Ok(config) => output.extend(describe(index, &config)),
            Err(e) => {
                invalid += 1;
                output.push(format!("[{index}] invalid"));
                output.extend(e.problems().iter().map(|p| format!("    - {p}")));
            }
        }
    }

    Described { output, invalid }
}

fn describe(index: usize, config: &FetchConfig) -> Vec<String> {
    vec![
        format!("[{index}] {} . {}", config.type_name, config.source_field),
        format!("    target:     {}", config.target_dir().display()),
        format!("    relative:   {}", config.source_dir().display()),
        format!("    cache:      {}", config.cache),
        format!("    original:   {}", config.original),
        format!("    local net:  {}", config.download_from_local_network),
        format!(
            "    fallback:   {}",
            config.fallback_image.as_deref().unwrap_or("(source url)")
        ),
        format!(
            "    normalize:  forceHttps={} normalizeProtocol={} defaultProtocol={}",
            config.normalization.force_https,
            config.normalization.normalize_protocol,
            config.normalization.default_protocol
        ),
    ]
}
