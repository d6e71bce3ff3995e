//! CLI entry point for the eyes-mirror tool.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use eyes_mirror::download::{INTERRUPTED_EXIT_CODE, spawn_ctrl_c_listener};
use eyes_mirror::site::ESSENTIAL_FILES;
use eyes_mirror::{HttpClient, Interrupt, MirrorProgress, run_mirror, verify_mirror};
use tracing::{debug, error, info};

mod app_config;
mod cli;
mod output;
mod terminal;

use cli::Args;
use terminal::TerminalCaps;

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    /// The run finished; individual file failures do not count.
    Success,
    /// The user pressed Ctrl-C.
    Interrupted,
    /// The mirror root could not be prepared or the engine could not start.
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Interrupted => ExitCode::from(INTERRUPTED_EXIT_CODE),
            ProcessExit::Failure => ExitCode::FAILURE,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let caps = TerminalCaps::detect();
    terminal::init_tracing(args.default_log_level(), caps.ansi_logs(args.no_color));
    debug!(?args, "CLI arguments parsed");

    let file_config = args
        .config
        .as_deref()
        .map(app_config::load_file_config)
        .transpose()?;
    let config = args.resolve(file_config.as_ref())?;
    let client = HttpClient::new(config.timeout).context("Failed to create HTTP client")?;

    let interrupt = Arc::new(Interrupt::new());
    let _ctrl_c = spawn_ctrl_c_listener(Arc::clone(&interrupt));

    let progress = Arc::new(if caps.progress_line(args.quiet) {
        MirrorProgress::with_progress_line()
    } else {
        MirrorProgress::hidden()
    });

    info!(
        site = %config.site.base_url(),
        output_dir = %config.output_dir.display(),
        concurrency = config.concurrency,
        "Mirror starting"
    );
    let started = Instant::now();

    let result = run_mirror(&config, &client, &progress, &interrupt).await;
    progress.finish();
    let snapshot = progress.snapshot();

    let exit = match &result {
        Ok(outcome) if outcome.interrupted => {
            output::print_cancellation(&snapshot);
            ProcessExit::Interrupted
        }
        Ok(outcome) => {
            debug!(?outcome, "mirror run finished");
            output::print_completion(started.elapsed(), &snapshot);
            ProcessExit::Success
        }
        Err(e) => {
            error!(error = %e, "Mirror run aborted");
            ProcessExit::Failure
        }
    };

    // Reported however the run ended.
    let report = verify_mirror(&config.output_dir, ESSENTIAL_FILES, progress.failures());
    output::print_verification(&report);

    Ok(exit.into())
}

