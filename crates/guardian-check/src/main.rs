//! guardianc - checks Guardian source files.
//!
//! Runs the front end over each file and prints formatted diagnostics.
//! Exits non-zero when any file has errors, so the checker can gate a
//! build pipeline.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "guardianc")]
#[command(about = "Check Guardian source files", version)]
struct Cli {
    /// Guardian source files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Only report, never print per-file success messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guardianc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut failed = false;
    for path in &cli.files {
        match guardian_compiler::check_file(path) {
            Ok(unit) => {
                if !unit.diagnostics.is_empty() {
                    print!("{}", unit.format_diagnostics());
                }
                if unit.is_clean() {
                    if !cli.quiet {
                        info!("{}: ok", path.display());
                    }
                } else {
                    failed = true;
                }
            }
            Err(err) => {
                error!("{}", err);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
