//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download remote images and rewrite the content file
    Run {
        /// JSON file mapping collection type names to their records
        #[arg(long, env = "IMGFETCH_CONTENT")]
        content: PathBuf,

        /// JSON options file, one entry or an array of entries
        #[arg(long, env = "IMGFETCH_CONFIG")]
        config: PathBuf,

        /// Where to write the rewritten content (defaults to --content)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Directory that targetPath and sourceRoot are relative to
        #[arg(long, env = "IMGFETCH_PROJECT_ROOT", default_value = ".")]
        project_root: PathBuf,

        /// Per-request HTTP timeout in seconds
        #[arg(long, env = "IMGFETCH_TIMEOUT_SECS", default_value_t = 30)]
        timeout_secs: u64,
    },

    /// Validate an options file and print the resolved configuration
    CheckConfig {
        /// JSON options file, one entry or an array of entries
        #[arg(long, env = "IMGFETCH_CONFIG")]
        config: PathBuf,

        /// Directory that targetPath and sourceRoot are relative to
        #[arg(long, env = "IMGFETCH_PROJECT_ROOT", default_value = ".")]
        project_root: PathBuf,
    },
}
