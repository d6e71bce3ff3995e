//! Eyes Mirror Library
//!
//! Builds a self-contained local copy of NASA's "Eyes on the Solar System"
//! web application: the HTML entry page, its bundles, the assets those
//! bundles reference, and a `config.local.js` that points the app at the
//! mirrored asset directories.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`site`] - Site addressing and the fixed seed/scan/essential file lists
//! - [`config`] - Resolved settings for one run
//! - [`download`] - HTTP fetching, worker pool, progress and interruption
//! - [`parser`] - Asset URL extraction, scoping and deduplication
//! - [`mirror`] - Run orchestration, local config writer and verification

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod mirror;
pub mod parser;
pub mod site;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::MirrorConfig;
pub use download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, EngineError, FailedDownload, HttpClient,
    Interrupt, MirrorProgress,
};
pub use mirror::{MirrorError, MirrorOutcome, VerificationReport, run_mirror, verify_mirror};
pub use parser::{extract_urls, resolve_asset};
pub use site::{SiteError, SiteProfile};
