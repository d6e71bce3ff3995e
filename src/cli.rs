//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use eyes_mirror::MirrorConfig;
use eyes_mirror::site::{DEFAULT_BASE_URL, DEFAULT_DOMAIN_SUFFIX, SiteProfile};

use crate::app_config::FileConfig;

/// Mirror NASA's "Eyes on the Solar System" web app for offline use.
///
/// With no options the application is mirrored into the current
/// directory. Serve that directory with any static file server and open
/// `index.html`.
#[derive(Parser, Debug)]
#[command(name = "eyes-mirror")]
#[command(author, version, about)]
pub struct Args {
    /// Directory to write the mirror into [default: .]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent asset downloads (1-100) [default: 10]
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Per-request read timeout in seconds (1-3600) [default: 30]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Application base URL to mirror
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Hosts ending with this suffix are mirrored
    #[arg(long, value_name = "SUFFIX")]
    pub domain_suffix: Option<String>,

    /// Read defaults from a `key = value` config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// Merges command-line values over config-file values over built-in defaults.
    pub fn resolve(&self, file: Option<&FileConfig>) -> Result<MirrorConfig> {
        let file = file.cloned().unwrap_or_default();

        let base_url = self
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let domain_suffix = self
            .domain_suffix
            .clone()
            .or(file.domain_suffix)
            .unwrap_or_else(|| DEFAULT_DOMAIN_SUFFIX.to_string());
        let site = SiteProfile::new(&base_url, &domain_suffix)
            .with_context(|| format!("Invalid site settings for '{base_url}'"))?;

        let mut config = MirrorConfig::new(site);
        if let Some(output_dir) = self.output_dir.clone().or(file.output_dir) {
            config = config.with_output_dir(output_dir);
        }
        if let Some(concurrency) = self.concurrency.map(usize::from).or(file.concurrency) {
            config = config.with_concurrency(concurrency);
        }
        if let Some(timeout) = self.timeout.or(file.timeout_secs) {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        Ok(config)
    }

    /// Default tracing level from `-q` / `-v`.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
