//! HTTP client wrapper for fetching mirror files.
//!
//! This module provides the `HttpClient` struct which streams a single URL
//! to a fixed destination path with proper timeout configuration and error
//! handling.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, WRITE_CHUNK_SIZE};
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for fetching files with streaming support.
///
/// This client is designed to be created once and reused for every seed and
/// asset download, taking advantage of connection pooling. Cloning is cheap.
///
/// # Example
///
/// ```no_run
/// use eyes_mirror::download::HttpClient;
/// use std::path::Path;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(Duration::from_secs(30))?;
/// let bytes = client
///     .fetch_to_path("https://eyes.nasa.gov/apps/solar-system/app.js", Path::new("./app.js"))
///     .await?;
/// println!("wrote {bytes} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// `timeout` bounds each socket read; connecting is bounded by a fixed
    /// 30 second timeout. Gzip decoding is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the underlying client cannot be
    /// built (e.g. TLS backend initialisation failure).
    pub fn new(timeout: Duration) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .read_timeout(timeout)
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()
            .map_err(|source| DownloadError::Client { source })?;
        Ok(Self { client })
    }

    /// Fetches `url` and writes the body to `destination`.
    ///
    /// Missing parent directories are created first. The destination is
    /// truncated unconditionally; only a `200 OK` response counts as
    /// success. A body that fails mid-stream, or whose fetch is dropped
    /// before it finishes, leaves no partial file behind.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns any status other than 200
    /// - Creating directories or writing to disk fails
    #[instrument(skip(self), fields(url = %url, path = %destination.display()))]
    pub async fn fetch_to_path(&self, url: &str, destination: &Path) -> Result<u64, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        if let Some(parent) = destination
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::io(parent, e))?;
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let file = File::create(destination)
            .await
            .map_err(|e| DownloadError::io(destination, e))?;
        let guard = PartialFileGuard::new(destination);

        let bytes_written = stream_to_file(file, response, url, destination).await?;
        guard.complete();

        debug!(bytes = bytes_written, "fetch complete");
        Ok(bytes_written)
    }
}

/// Removes a freshly truncated destination on drop unless the body was
/// fully written.
///
/// Covers both error returns and a fetch future dropped mid-body by an
/// interrupt, where no async cleanup can run.
struct PartialFileGuard<'a> {
    path: &'a Path,
    complete: bool,
}

impl<'a> PartialFileGuard<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            complete: false,
        }
    }

    fn complete(mut self) {
        self.complete = true;
    }
}

impl Drop for PartialFileGuard<'_> {
    fn drop(&mut self) {
        if !self.complete {
            debug!(path = %self.path.display(), "removing incomplete file");
            let _ = std::fs::remove_file(self.path);
        }
    }
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(WRITE_CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_transport(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}
