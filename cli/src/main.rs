//! CLI for tap update reports.
//!
//! Run after the updater has fetched every tap. Reports which formulae and
//! casks changed and migrates installed packages that moved or were renamed.

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tap_update_report::{
    Category, RunSummary, Runner, RunnerConfig, RunnerError, UpdateSettings,
};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Report formula and cask changes after a tap update.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Fast auto-update mode: report every modification without loading formulae.
    #[arg(long)]
    preinstall: bool,

    /// Migrate renamed formulae even across mismatched taps or versions.
    #[arg(short, long)]
    force: bool,

    /// Suppress informational output.
    #[arg(short, long)]
    quiet: bool,

    /// Log each tap's changes as they are found.
    #[arg(short, long)]
    verbose: bool,

    /// Surface recovered failures as errors.
    #[arg(long, env = "HOMEBREW_DEVELOPER", value_parser = clap::builder::FalseyValueParser::new())]
    developer: bool,

    /// Path to an update-report.toml settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Installation prefix.
    #[arg(long, env = "HOMEBREW_PREFIX")]
    prefix: Option<PathBuf>,

    /// Print the run summary as JSON instead of the human-readable report.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();
    let json = args.json;

    match run(args) {
        Ok(summary) => {
            if json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(output) => println!("{output}"),
                    Err(e) => {
                        error!(error = %e, "Failed to serialize summary");
                        return ExitCode::from(2);
                    }
                }
            } else {
                print_summary(&summary);
            }

            if summary.failed {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing on stderr, filtered by `RUST_LOG` (default "info").
///
/// Stdout carries the report itself.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let mut settings = UpdateSettings::load_or_default(args.config.as_deref())?;
    if let Some(prefix) = args.prefix {
        settings = settings.with_prefix(prefix);
    }

    let config = RunnerConfig::new(settings, args.preinstall, args.force, args.quiet)
        .with_verbose(args.verbose)
        .with_developer(args.developer);
    let runner = Runner::new(config);

    if args.json {
        runner.run(&mut io::sink())
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let summary = runner.run(&mut out)?;
        out.flush()?;
        Ok(summary)
    }
}

/// Prints totals to stderr when any migration ran.
fn print_summary(summary: &RunSummary) {
    let migrations =
        summary.migrations_performed + summary.migrations_skipped + summary.migrations_failed;
    if migrations == 0 {
        return;
    }

    eprintln!("\nSummary:");
    eprintln!("  Taps updated: {}", summary.taps_updated.len());
    eprintln!("  Formulae updated: {}", summary.count(Category::Modified));
    eprintln!("  Formulae deleted: {}", summary.count(Category::Deleted));
    eprintln!("  Casks updated: {}", summary.count(Category::CaskModified));
    eprintln!("  Casks deleted: {}", summary.count(Category::CaskDeleted));
    eprintln!("  Migrations performed: {}", summary.migrations_performed);
    eprintln!("  Migrations skipped: {}", summary.migrations_skipped);
    eprintln!("  Migrations failed: {}", summary.migrations_failed);
}
