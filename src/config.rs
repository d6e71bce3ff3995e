//! Resolved settings for one mirror run.

use std::path::PathBuf;
use std::time::Duration;

use crate::download::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
use crate::site::{SiteError, SiteProfile};

/// Everything [`crate::mirror::run_mirror`] needs to know about a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Site being mirrored.
    pub site: SiteProfile,
    /// Mirror root; every output path is relative to it.
    pub output_dir: PathBuf,
    /// Worker count for the concurrent asset phase.
    pub concurrency: usize,
    /// Per-request read timeout.
    pub timeout: Duration,
}

impl MirrorConfig {
    /// Default run: the Eyes on the Solar System site into the current directory.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in site constants are malformed.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use eyes_mirror::config::MirrorConfig;
    ///
    /// let config = MirrorConfig::eyes_on_the_solar_system().unwrap();
    /// assert_eq!(config.output_dir, PathBuf::from("."));
    /// assert_eq!(config.concurrency, 10);
    /// ```
    pub fn eyes_on_the_solar_system() -> Result<Self, SiteError> {
        Ok(Self::new(SiteProfile::eyes_on_the_solar_system()?))
    }

    /// Default settings for an arbitrary site.
    #[must_use]
    pub fn new(site: SiteProfile) -> Self {
        Self {
            site,
            output_dir: PathBuf::from("."),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the mirror root.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the asset worker count.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the per-request read timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
