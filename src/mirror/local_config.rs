//! The local override file that points the app at mirrored asset paths.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::download::DownloadError;

/// File name of the override, relative to the mirror root.
pub const LOCAL_CONFIG_FILE: &str = "config.local.js";

/// Exact contents of [`LOCAL_CONFIG_FILE`].
pub const LOCAL_CONFIG_CONTENTS: &str = "config = {\n\
\tstaticAssetsUrl: './assets/static',\n\
\tdynamicAssetsUrl: './assets/dynamic',\n\
\tanimdataUrl: './server/spice'\n\
}\n";

/// Writes (or overwrites) the override file under `root`.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if the file cannot be written.
#[instrument(fields(root = %root.display()))]
pub async fn write_local_config(root: &Path) -> Result<PathBuf, DownloadError> {
    let path = root.join(LOCAL_CONFIG_FILE);
    tokio::fs::write(&path, LOCAL_CONFIG_CONTENTS)
        .await
        .map_err(|e| DownloadError::io(path.clone(), e))?;
    debug!(path = %path.display(), "wrote local config");
    Ok(path)
}
