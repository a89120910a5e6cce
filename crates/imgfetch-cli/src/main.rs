//! CLI entry point - the composition root.
//!
//! Parses arguments, sets up logging and dispatches to handlers. Handler
//! errors end the process with the exit code of their [`CliError`].

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use imgfetch_cli::handlers::{check_config, run};
use imgfetch_cli::{Cli, CliConfig, CliError, Commands, bootstrap};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if let Err(e) = dispatch(cli.command).await {
        tracing::error!("{e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}

/// `RUST_LOG` wins unless `--verbose` is given; the default level is `info`.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}

async fn dispatch(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Run {
            content,
            config,
            output,
            project_root,
            timeout_secs,
        } => {
            let ctx = bootstrap(
                CliConfig::with_defaults()
                    .with_project_root(project_root)
                    .with_timeout(Duration::from_secs(timeout_secs)),
            )?;
            let args = run::RunArgs {
                content,
                config,
                output,
            };
            run::execute(&ctx, &args).await?;
        }
        Commands::CheckConfig {
            config,
            project_root,
        } => {
            check_config::execute(&config, &project_root).await?;
        }
    }
    Ok(())
}
