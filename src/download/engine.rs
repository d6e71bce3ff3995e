//! Download engine for concurrent asset fetches.
//!
//! This module provides the `DownloadEngine` which coordinates concurrent
//! downloads using a semaphore-based concurrency control pattern. Every
//! fetch is best-effort: failures are recorded in the shared
//! [`MirrorProgress`] and never retried.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use eyes_mirror::download::{DownloadEngine, DownloadTask, HttpClient, Interrupt, MirrorProgress};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(10)?;
//! let client = HttpClient::new(Duration::from_secs(30))?;
//! let progress = Arc::new(MirrorProgress::hidden());
//! let tasks = vec![DownloadTask::new(
//!     "https://eyes.nasa.gov/assets/static/foo.png",
//!     PathBuf::from("assets/static/foo.png"),
//! )];
//! progress.add_total(tasks.len());
//! let outcome = engine
//!     .download_all(&client, tasks, &progress, &Interrupt::new())
//!     .await?;
//! println!("completed {}, failed {}", outcome.completed, outcome.failed);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::HttpClient;
use super::interrupt::Interrupt;
use super::progress::{FailedDownload, MirrorProgress};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default number of concurrent asset downloads.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// A single URL to fetch and the path to write it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Absolute source URL.
    pub source_url: String,
    /// Destination path (already joined with the mirror root).
    pub destination: PathBuf,
}

impl DownloadTask {
    /// Creates a new task.
    pub fn new(source_url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination: destination.into(),
        }
    }
}

/// Fetches one task and records the result in `progress`.
///
/// Returns `true` when the file was written. Failures are logged above the
/// progress line and appended to the failure log; they never propagate.
pub async fn fetch_and_record(
    client: &HttpClient,
    task: &DownloadTask,
    progress: &MirrorProgress,
) -> bool {
    match client
        .fetch_to_path(&task.source_url, &task.destination)
        .await
    {
        Ok(bytes) => {
            debug!(url = %task.source_url, bytes, "downloaded");
            progress.record_success();
            true
        }
        Err(e) => {
            debug!(url = %task.source_url, error = %e, "fetch failed");
            progress.record_failure(FailedDownload::new(
                task.source_url.clone(),
                task.destination.clone(),
                e.reason(),
            ));
            false
        }
    }
}

/// Tally of one concurrent download phase.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Tasks handed to the worker pool.
    pub dispatched: usize,
    /// Tasks that wrote their file.
    pub completed: usize,
    /// Tasks whose fetch failed (recorded in the failure log).
    pub failed: usize,
    /// Tasks aborted by an interrupt before finishing.
    pub aborted: usize,
    /// Tasks that panicked; caught at the join point.
    pub panicked: usize,
    /// Whether the phase stopped because of an interrupt.
    pub interrupted: bool,
}

/// Concurrent downloader with a fixed worker count.
///
/// # Concurrency Model
///
/// - Each download runs in its own Tokio task inside a [`JoinSet`]
/// - A semaphore permit is acquired before spawning each download
/// - Permits are released automatically when downloads complete (RAII)
/// - An interrupt stops dispatching and aborts in-flight tasks
#[derive(Debug)]
pub struct DownloadEngine {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
}

impl DownloadEngine {
    /// Creates a new download engine with the specified concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use eyes_mirror::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(10).unwrap();
    /// assert_eq!(engine.concurrency(), 10);
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every task concurrently and waits for all of them.
    ///
    /// Callers are expected to have added `tasks.len()` to the progress
    /// total already. Individual download failures do NOT cause this method
    /// to error; they are counted in the outcome and the failure log.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    #[instrument(skip_all, fields(tasks = tasks.len(), concurrency = self.concurrency))]
    pub async fn download_all(
        &self,
        client: &HttpClient,
        tasks: Vec<DownloadTask>,
        progress: &Arc<MirrorProgress>,
        interrupt: &Interrupt,
    ) -> Result<DispatchOutcome, EngineError> {
        let mut outcome = DispatchOutcome::default();
        let mut workers = JoinSet::new();

        info!("starting concurrent downloads");

        for task in tasks {
            if interrupt.is_triggered() {
                outcome.interrupted = true;
                break;
            }

            let permit = tokio::select! {
                biased;
                () = interrupt.wait() => None,
                permit = Arc::clone(&self.semaphore).acquire_owned() => Some(permit),
            };
            let Some(permit) = permit else {
                outcome.interrupted = true;
                break;
            };
            let permit = permit.map_err(|_| EngineError::SemaphoreClosed)?;

            let client = client.clone();
            let progress = Arc::clone(progress);
            workers.spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;
                fetch_and_record(&client, &task, &progress).await
            });
            outcome.dispatched += 1;
        }

        if outcome.interrupted {
            debug!(dispatched = outcome.dispatched, "interrupt during dispatch; aborting workers");
            workers.abort_all();
        }

        debug!(task_count = workers.len(), "waiting for downloads to complete");

        loop {
            let joined = tokio::select! {
                biased;
                () = interrupt.wait(), if !outcome.interrupted => {
                    outcome.interrupted = true;
                    workers.abort_all();
                    continue;
                }
                joined = workers.join_next() => joined,
            };
            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok(true) => outcome.completed += 1,
                Ok(false) => outcome.failed += 1,
                Err(e) if e.is_cancelled() => outcome.aborted += 1,
                Err(e) => {
                    // Task panics are logged but don't fail the batch
                    progress.suspend(|| warn!(error = %e, "Error during download"));
                    outcome.panicked += 1;
                }
            }
        }

        info!(
            dispatched = outcome.dispatched,
            completed = outcome.completed,
            failed = outcome.failed,
            aborted = outcome.aborted,
            interrupted = outcome.interrupted,
            "concurrent downloads finished"
        );

        Ok(outcome)
    }
}
