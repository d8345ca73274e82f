//! pysbom: CycloneDX SBOM generator for Python project environments
//!
//! Discovers installed packages from multiple sources, merges them with
//! provenance tracking, and emits a CycloneDX 1.5 JSON document.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use pysbom::{cli, config::GenerateConfig, pipeline::exit_codes};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pysbom")]
#[command(version)]
#[command(about = "Generate CycloneDX SBOMs for Python project environments", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Document generated and written
    1  Error occurred

EXAMPLES:
    # SBOM for the project in the current directory
    pysbom generate

    # Explicit environment, compact JSON to stdout
    pysbom generate --site-packages .venv/lib/python3.11/site-packages \\
        --output - --compact

    # Include per-component transitive closures as properties
    pysbom generate --emit-closure -o full-sbom.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `generate` subcommand
#[derive(Parser)]
struct GenerateArgs {
    /// Project directory holding pyproject.toml / poetry.lock
    #[arg(short, long, default_value = ".", env = "PYSBOM_PROJECT_DIR")]
    project_dir: PathBuf,

    /// Site-packages directory to scan for installed distribution metadata
    ///
    /// Defaults to probing `$VIRTUAL_ENV` and `<project>/.venv`.
    #[arg(long)]
    site_packages: Option<PathBuf>,

    /// Frozen requirements listing (pip freeze output)
    ///
    /// Defaults to `<project>/requirements.txt`; absent files are skipped.
    #[arg(long)]
    freeze_file: Option<PathBuf>,

    /// Output path (`-` for stdout)
    #[arg(short, long, default_value = "sbom.json")]
    output: PathBuf,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Record each component's transitive dependency closure as a property
    #[arg(long)]
    emit_closure: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a CycloneDX SBOM for a Python project
    Generate(GenerateArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Generate(args) => {
            let config = GenerateConfig {
                project_dir: args.project_dir,
                site_packages: args.site_packages,
                freeze_file: args.freeze_file,
                output: args.output,
                pretty: !args.compact,
                emit_closure: args.emit_closure,
            };
            if let Err(err) = cli::run_generate(&config) {
                tracing::error!("{err}");
                std::process::exit(exit_codes::ERROR);
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "pysbom", &mut io::stdout());
        }
    }
    Ok(())
}
