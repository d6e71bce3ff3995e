//! Constants for the download module (timeouts and buffering).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default per-read idle timeout (30 seconds); there is no whole-request deadline.
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Buffer size used when streaming response bodies to disk.
pub const WRITE_CHUNK_SIZE: usize = 8192;

/// Default request timeout as a [`Duration`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(READ_TIMEOUT_SECS);
