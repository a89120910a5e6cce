//! Run command handler.
//!
//! Processes every valid options entry against the content file, then writes
//! the rewritten content once.

use std::path::PathBuf;
use std::sync::Arc;

use imgfetch_core::{CollectionReport, ContentStoreError, FetchConfig, FetchOptions, FetchSummary};
use tracing::{info, warn};

use crate::bootstrap::CliContext;
use crate::content_store::JsonFileContentStore;
use crate::error::CliError;
use crate::options::load_options;

/// Arguments for the run command.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub content: PathBuf,
    pub config: PathBuf,
    pub output: Option<PathBuf>,
}

/// Execute the run command.
///
/// Invalid entries and missing collections are skipped with a warning. Only
/// failures to read or write the content file abort the run.
pub async fn execute(
    ctx: &CliContext,
    args: &RunArgs,
) -> Result<Vec<CollectionReport>, CliError> {
    let entries = load_options(&args.config).await?;
    let configs = resolve_entries(&entries, ctx);

    let store = Arc::new(JsonFileContentStore::load(&args.content).await?);
    let service = ctx.remote_images(store.clone());

    let mut reports = Vec::with_capacity(configs.len());
    for config in &configs {
        match service.update_nodes(config).await {
            Ok(report) => {
                print_report(&report);
                reports.push(report);
            }
            Err(ContentStoreError::CollectionNotFound { type_name }) => {
                warn!(type_name = %type_name, "No such collection in content file, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let output = args.output.as_ref().unwrap_or(&args.content);
    store.save(output).await?;
    info!(path = %output.display(), collections = reports.len(), "Content written");

    if reports.len() > 1 {
        let total = run_total(&reports);
        println!(
            "total: {} source(s), {} failed",
            total.total(),
            total.failed()
        );
    }

    Ok(reports)
}

/// Validate each entry; invalid ones are reported and dropped.
fn resolve_entries(entries: &[FetchOptions], ctx: &CliContext) -> Vec<FetchConfig> {
    entries
        .iter()
        .enumerate()
        .filter_map(
            |(index, options)| match FetchConfig::from_options(options, &ctx.project_root) {
                Ok(config) => Some(config),
                Err(e) => {
                    let problems: Vec<String> =
                        e.problems().iter().map(ToString::to_string).collect();
                    warn!(
                        entry = index,
                        problems = ?problems,
                        "Remote images are not downloaded. Please check your configuration."
                    );
                    None
                }
            },
        )
        .collect()
}

/// Outcome counts across every processed collection.
fn run_total(reports: &[CollectionReport]) -> FetchSummary {
    let mut total = FetchSummary::default();
    for report in reports {
        total.merge(&report.summary);
    }
    total
}

fn print_report(report: &CollectionReport) {
    let s = &report.summary;
    println!(
        "{}: {} field(s), {} downloaded, {} cached, {} local, {} failed, {} unchanged",
        report.type_name,
        report.traversal.leaves,
        s.downloaded,
        s.cached,
        s.local,
        s.fallback,
        s.unchanged
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgfetch_core::TraversalReport;

    fn report(type_name: &str, summary: FetchSummary) -> CollectionReport {
        CollectionReport {
            type_name: type_name.to_string(),
            traversal: TraversalReport::default(),
            summary,
        }
    }

    #[test]
    fn test_run_total_adds_up_collections() {
        let posts = FetchSummary {
            downloaded: 2,
            fallback: 1,
            ..Default::default()
        };
        let authors = FetchSummary {
            cached: 1,
            local: 3,
            unchanged: 1,
            ..Default::default()
        };

        let total = run_total(&[report("Post", posts), report("Author", authors)]);

        assert_eq!(total.downloaded, 2);
        assert_eq!(total.local, 3);
        assert_eq!(total.total(), 8);
        assert_eq!(total.failed(), 2);
    }

    #[test]
    fn test_run_total_of_nothing_is_empty() {
        assert_eq!(run_total(&[]), FetchSummary::default());
    }
}
