//! Shared progress counters and failure log for a mirror run.
//!
//! One [`MirrorProgress`] is created per run and handed to every worker
//! behind an `Arc`. Counters are atomics and the failure log is an
//! append-only list behind a mutex, so concurrent fetches never lose an
//! increment or an entry.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

/// One failed fetch, as reported at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    /// Source URL that failed.
    pub url: String,
    /// Destination path the file would have been written to.
    pub path: PathBuf,
    /// Short reason (`Status code 404`, transport error text, ...).
    pub message: String,
}

impl FailedDownload {
    /// Creates a new failure entry.
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Files written successfully so far.
    pub downloaded: usize,
    /// Files scheduled so far (grows as phases are entered).
    pub total: usize,
    /// Failures recorded so far.
    pub errors: usize,
}

impl ProgressSnapshot {
    /// Percentage of scheduled files that completed, `0.0` when nothing is scheduled.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.downloaded as f64 / self.total as f64) * 100.0
        }
    }

    /// Renders the single-line progress display.
    ///
    /// ```
    /// use eyes_mirror::download::ProgressSnapshot;
    ///
    /// let snapshot = ProgressSnapshot { downloaded: 3, total: 4, errors: 1 };
    /// assert_eq!(snapshot.render(), "Progress: 3/4 files (75.0%) - 1 errors");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Progress: {}/{} files ({:.1}%) - {} errors",
            self.downloaded,
            self.total,
            self.percentage(),
            self.errors
        )
    }
}

/// Thread-safe progress and failure tracking for one run.
#[derive(Debug)]
pub struct MirrorProgress {
    total: AtomicUsize,
    downloaded: AtomicUsize,
    failures: Mutex<Vec<FailedDownload>>,
    bar: ProgressBar,
}

impl Default for MirrorProgress {
    fn default() -> Self {
        Self::hidden()
    }
}

impl MirrorProgress {
    /// Creates a tracker that redraws a single progress line on stderr.
    #[must_use]
    pub fn with_progress_line() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self::with_bar(bar)
    }

    /// Creates a tracker that only counts (quiet mode, non-terminal output, tests).
    #[must_use]
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        Self {
            total: AtomicUsize::new(0),
            downloaded: AtomicUsize::new(0),
            failures: Mutex::new(Vec::new()),
            bar,
        }
    }

    /// Adds `count` files to the scheduled total.
    pub fn add_total(&self, count: usize) {
        self.total.fetch_add(count, Ordering::SeqCst);
        self.redraw();
    }

    /// Records one successfully written file.
    pub fn record_success(&self) {
        self.downloaded.fetch_add(1, Ordering::SeqCst);
        self.redraw();
    }

    /// Logs a failure above the progress line and appends it to the log.
    pub fn record_failure(&self, failure: FailedDownload) {
        self.bar.suspend(|| {
            warn!(url = %failure.url, error = %failure.message, "Failed to download");
        });
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure);
        self.redraw();
    }

    /// Returns the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            downloaded: self.downloaded.load(Ordering::SeqCst),
            total: self.total.load(Ordering::SeqCst),
            errors: self
                .failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
        }
    }

    /// Returns a copy of the failure log in recording order.
    #[must_use]
    pub fn failures(&self) -> Vec<FailedDownload> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs `f` with the progress line temporarily cleared, so printed
    /// headings do not interleave with the redrawn line.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Leaves the last rendered line on screen and stops redrawing.
    pub fn finish(&self) {
        self.bar.finish();
    }

    fn redraw(&self) {
        let snapshot = self.snapshot();
        if snapshot.total > 0 {
            self.bar.set_message(snapshot.render());
        }
    }
}
