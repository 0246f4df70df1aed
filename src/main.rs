//! Sitetrace main entry point
//!
//! This is the command-line interface for the Sitetrace web tracer.

use clap::Parser;
use sitetrace::config::{load_optional_config, Overrides};
use sitetrace::crawler::{resume_trace, start_trace, TraceOutcome};
use sitetrace::output::print_statistics;
use sitetrace::state::StopSignal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status after an interrupted trace whose snapshot was written
const EXIT_INTERRUPTED: u8 = 130;

/// Sitetrace: a small web tracer
///
/// Follows <a href> links from a root URL, depth-first, and writes the
/// discovered link hierarchy, indented by depth. Press Ctrl-C to stop and
/// save a snapshot; run again with --continue to pick up where it stopped.
#[derive(Parser, Debug)]
#[command(name = "sitetrace")]
#[command(version)]
#[command(about = "A small web tracer", long_about = None)]
struct Cli {
    /// Root URL to trace from
    #[arg(value_name = "ROOT_URL", required_unless_present = "resume")]
    root: Option<String>,

    /// Maximum link depth to follow (0 = unbounded)
    #[arg(short = 'l', long = "level", value_name = "N")]
    max_depth: Option<u32>,

    /// Write the link hierarchy to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Snapshot file written on interruption [default: trace.dump]
    #[arg(short = 'f', long = "snapshot", value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Follow links containing query strings
    #[arg(short = 'd', long = "dynamic")]
    dynamic: bool,

    /// Print each link's raw and normalized value
    #[arg(short = 'D', long = "debug")]
    debug: bool,

    /// Resume from the snapshot file instead of starting fresh
    #[arg(long = "continue")]
    resume: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output on stderr
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            max_depth: self.max_depth,
            output: self.output.clone(),
            snapshot: self.snapshot.clone(),
            dynamic_urls: self.dynamic,
            debug: self.debug,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet, cli.debug);

    let quiet = cli.quiet;
    match run(cli).await {
        Ok(outcome) => {
            if !quiet {
                print_statistics(outcome.statistics());
            }
            if outcome.is_interrupted() {
                ExitCode::from(EXIT_INTERRUPTED)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("Trace failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber on stderr based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, debug: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match (verbose, debug) {
            (0, false) => EnvFilter::new("sitetrace=info,warn"),
            (0, true) | (1, _) => EnvFilter::new("sitetrace=debug,info"),
            (2, _) => EnvFilter::new("sitetrace=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> sitetrace::Result<TraceOutcome> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_optional_config(cli.config.as_deref())?;
    let overrides = cli.overrides();

    let stop = StopSignal::new();
    listen_for_interrupt(stop.clone());

    if cli.resume {
        resume_trace(&config, &overrides, cli.root.as_deref(), &stop).await
    } else {
        // clap guarantees the root is present without --continue
        let root = cli.root.as_deref().unwrap_or_default();
        start_trace(root, &config, &overrides, &stop).await
    }
}

/// Raises the stop signal on Ctrl-C; a second Ctrl-C exits immediately
///
/// Link records are line-buffered, so an immediate exit loses no output.
fn listen_for_interrupt(stop: StopSignal) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Unable to listen for interrupts: {}", e);
                return;
            }

            if stop.request_stop() {
                tracing::warn!("Second interrupt, exiting without a snapshot");
                std::process::exit(i32::from(EXIT_INTERRUPTED));
            }

            tracing::warn!(
                "Interrupt received, finishing the current page before writing a snapshot"
            );
        }
    });
}
