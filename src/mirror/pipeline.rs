//! The mirror run: prepare, seed, scan, resolve, download, configure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::local_config::write_local_config;
use crate::config::MirrorConfig;
use crate::download::{
    DispatchOutcome, DownloadEngine, DownloadTask, EngineError, HttpClient, Interrupt,
    MirrorProgress, fetch_and_record,
};
use crate::parser::{UniqueAssets, dedupe, extract_asset_urls, resolve_asset};
use crate::site::{MIRROR_DIRECTORIES, SiteProfile};

/// Errors that stop a run before it reaches the report.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The mirror root or one of its fixed subdirectories could not be created.
    #[error("cannot prepare mirror directory {path}: {source}")]
    Prepare {
        /// Directory that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The asset download engine could not be set up or run.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl MirrorError {
    /// Creates a preparation error.
    pub fn prepare(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Prepare {
            path: path.into(),
            source,
        }
    }
}

/// What a finished (or interrupted) run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorOutcome {
    /// Distinct assets found by scanning the bundles.
    pub unique_assets: usize,
    /// Tally of the concurrent asset phase.
    pub dispatch: DispatchOutcome,
    /// Whether the run stopped early on user request.
    pub interrupted: bool,
    /// Whether `config.local.js` was written.
    pub config_written: bool,
}

/// Runs one mirror pass of `config.site` into `config.output_dir`.
///
/// Per-file failures are recorded in `progress` and never abort the run.
/// When `interrupt` fires, the current phase is abandoned, later phases are
/// skipped and the local config is not written; the outcome reports
/// `interrupted` so the caller can still print its summary.
///
/// # Errors
///
/// Returns [`MirrorError::Engine`] for an out-of-range worker count and
/// [`MirrorError::Prepare`] if the mirror directories cannot be created.
#[instrument(skip_all, fields(root = %config.output_dir.display(), site = %config.site.base_url()))]
pub async fn run_mirror(
    config: &MirrorConfig,
    client: &HttpClient,
    progress: &Arc<MirrorProgress>,
    interrupt: &Interrupt,
) -> Result<MirrorOutcome, MirrorError> {
    let engine = DownloadEngine::new(config.concurrency)?;
    let root = config.output_dir.as_path();
    let mut outcome = MirrorOutcome::default();

    prepare_directories(root).await?;

    if !download_seeds(&config.site, root, client, progress, interrupt).await {
        outcome.interrupted = true;
        return Ok(outcome);
    }

    let unique = discover_assets(&config.site, root).await;
    outcome.unique_assets = unique.len();
    progress.suspend(|| info!("Found {} unique assets to download", unique.len()));
    progress.add_total(unique.len());

    outcome.dispatch = engine
        .download_all(client, unique.into_tasks(root), progress, interrupt)
        .await?;
    if outcome.dispatch.interrupted {
        outcome.interrupted = true;
        return Ok(outcome);
    }

    match write_local_config(root).await {
        Ok(path) => {
            progress.suspend(|| info!(path = %path.display(), "Created local config"));
            outcome.config_written = true;
        }
        Err(e) => warn!(error = %e, "Failed to write local config"),
    }

    Ok(outcome)
}

/// Creates the mirror root and its fixed subdirectories.
///
/// # Errors
///
/// Returns [`MirrorError::Prepare`] naming the first directory that failed.
pub async fn prepare_directories(root: &Path) -> Result<(), MirrorError> {
    tokio::fs::create_dir_all(root)
        .await
        .map_err(|e| MirrorError::prepare(root, e))?;
    for dir in MIRROR_DIRECTORIES {
        let path = root.join(dir);
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| MirrorError::prepare(&path, e))?;
    }
    debug!(directories = MIRROR_DIRECTORIES.len(), "mirror directories ready");
    Ok(())
}

/// Fetches every seed group in order, one file at a time.
///
/// Returns `false` if the run was interrupted.
async fn download_seeds(
    site: &SiteProfile,
    root: &Path,
    client: &HttpClient,
    progress: &MirrorProgress,
    interrupt: &Interrupt,
) -> bool {
    for group in site.seed_groups() {
        if interrupt.is_triggered() {
            return false;
        }

        progress.suspend(|| info!("Downloading {}...", group.label));
        progress.add_total(group.entries.len());

        for (url, local) in group.entries {
            let task = DownloadTask::new(url, root.join(local));
            let finished = tokio::select! {
                biased;
                () = interrupt.wait() => false,
                _ = fetch_and_record(client, &task, progress) => true,
            };
            if !finished {
                debug!(url = %task.source_url, "seed download abandoned");
                return false;
            }
        }
    }
    true
}

/// Scans the downloaded bundles and returns the in-scope assets they reference.
///
/// A bundle that cannot be read (usually because its own download failed)
/// is skipped with a warning.
async fn discover_assets(site: &SiteProfile, root: &Path) -> UniqueAssets {
    debug!("scanning bundles for asset references");
    let mut records = Vec::new();

    for target in site.scan_targets() {
        let path = root.join(&target.path);
        match extract_asset_urls(&path, &target.base_url, site).await {
            Ok(urls) => records.extend(urls.iter().filter_map(|url| resolve_asset(url, site))),
            Err(e) => warn!(error = %e, "Skipping bundle scan"),
        }
    }

    dedupe(records)
}
