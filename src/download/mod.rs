//! HTTP fetching for the mirror: single-file client, concurrent engine,
//! shared progress tracking and cooperative interruption.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large assets)
//! - Parent directories created on demand, destinations always overwritten
//! - Bounded worker pool for the asset phase
//! - Thread-safe success counter and failure log
//!
//! # Example
//!
//! ```no_run
//! use eyes_mirror::download::HttpClient;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(Duration::from_secs(30))?;
//! client
//!     .fetch_to_path("https://eyes.nasa.gov/apps/solar-system/", Path::new("./index.html"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod interrupt;
mod progress;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT, READ_TIMEOUT_SECS, WRITE_CHUNK_SIZE};
pub use engine::{
    DEFAULT_CONCURRENCY, DispatchOutcome, DownloadEngine, DownloadTask, EngineError,
    fetch_and_record,
};
pub use error::DownloadError;
pub use interrupt::{INTERRUPTED_EXIT_CODE, Interrupt, spawn_ctrl_c_listener};
pub use progress::{FailedDownload, MirrorProgress, ProgressSnapshot};
