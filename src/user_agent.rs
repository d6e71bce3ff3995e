//! User-Agent string sent with every mirror request.

/// Default User-Agent for download requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("eyes-mirror/{version} (offline-mirror-tool)")
}
