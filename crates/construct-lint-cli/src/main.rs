//! construct-lint CLI tool.
//!
//! Usage:
//! ```bash
//! construct-lint check [OPTIONS] --schema <FILE> [ASSEMBLY]
//! construct-lint list-rules
//! construct-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

/// Convention linter for construct libraries
#[derive(Parser)]
#[command(name = "construct-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint assembly snapshots against a schema catalog
    Check {
        /// Assembly snapshot, or a directory searched for `*.assembly.json`
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Schema catalog JSON
        #[arg(short, long, env = "CONSTRUCT_LINT_SCHEMA")]
        schema: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns, `<code-glob>:<scope-glob>` (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            path,
            schema,
            format,
            rules,
            exclude,
        } => {
            let options = commands::check::CheckOptions {
                path: &path,
                schema: &schema,
                format,
                rules,
                exclude,
            };
            let outcome = config::load_config(project_dir(&path), cli.config.as_deref())
                .and_then(|config| commands::check::run(&options, config));
            if let Err(e) = outcome {
                eprintln!("Error: {e:?}");
                std::process::exit(2);
            }
            Ok(())
        }
        Commands::ListRules => {
            let config = config::load_config(Path::new("."), cli.config.as_deref())?;
            commands::list_rules::run(&config);
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

/// Directory whose config applies to `path`.
fn project_dir(path: &Path) -> &Path {
    if path.is_dir() {
        path
    } else {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }
}
