//! Resolution of absolute asset URLs to mirror paths, plus deduplication.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use url::Url;

use crate::download::DownloadTask;
use crate::site::{SiteProfile, netloc};

/// Subtree that holds assets served from secondary hosts.
pub const EXTERNAL_DIR: &str = "external";

/// An in-scope asset and where it lands inside the mirror root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// URL with the query string removed; also the deduplication key.
    pub url: String,
    /// Path relative to the mirror root.
    pub output_path: PathBuf,
}

impl AssetRecord {
    /// Converts the record into a download task rooted at `root`.
    #[must_use]
    pub fn into_task(self, root: &Path) -> DownloadTask {
        DownloadTask::new(self.url, root.join(self.output_path))
    }
}

/// Resolves an absolute URL string into an [`AssetRecord`].
///
/// Returns `None` (the asset is skipped) when the URL:
/// - is a `data:` URI
/// - does not parse, or is not http(s)
/// - has a host outside the site's domain suffix
/// - maps to no file (empty path, directory URL, or a segment that would
///   escape the mirror root once decoded)
///
/// Primary-host paths are used as-is; other accepted hosts are placed under
/// `external/<host>/`.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use eyes_mirror::parser::resolve_asset;
/// use eyes_mirror::site::SiteProfile;
///
/// let site = SiteProfile::eyes_on_the_solar_system().unwrap();
/// let record = resolve_asset("https://eyes.nasa.gov/assets/static/foo.png?v=2", &site).unwrap();
/// assert_eq!(record.url, "https://eyes.nasa.gov/assets/static/foo.png");
/// assert_eq!(record.output_path, PathBuf::from("assets/static/foo.png"));
/// ```
#[must_use]
pub fn resolve_asset(url: &str, site: &SiteProfile) -> Option<AssetRecord> {
    if url.starts_with("data:") {
        return None;
    }

    let clean_url = url.split('?').next().unwrap_or(url);
    let Ok(parsed) = Url::parse(clean_url) else {
        trace!(url = %clean_url, "skipping unparsable asset URL");
        return None;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let host = parsed.host_str()?;
    if !host.ends_with(site.domain_suffix()) {
        trace!(url = %clean_url, host, "skipping out-of-scope host");
        return None;
    }

    let Some(relative) = relative_output_path(parsed.path()) else {
        debug!(url = %clean_url, "skipping asset URL without a file path");
        return None;
    };

    let host_netloc = netloc(&parsed);
    let output_path = if host_netloc == site.primary_netloc() {
        relative
    } else {
        Path::new(EXTERNAL_DIR).join(host_netloc).join(relative)
    };

    Some(AssetRecord {
        url: clean_url.to_string(),
        output_path,
    })
}

/// Maps a percent-encoded URL path onto a relative file path.
fn relative_output_path(encoded_path: &str) -> Option<PathBuf> {
    let trimmed = encoded_path.strip_prefix('/').unwrap_or(encoded_path);
    if trimmed.is_empty() || trimmed.ends_with('/') {
        return None;
    }

    let mut path = PathBuf::new();
    for segment in trimmed.split('/').filter(|s| !s.is_empty()) {
        let decoded = urlencoding::decode(segment).unwrap_or_else(|_| segment.into());
        if matches!(&*decoded, "." | "..") || decoded.contains(['/', '\\', '\0']) {
            return None;
        }
        path.push(&*decoded);
    }

    (!path.as_os_str().is_empty()).then_some(path)
}

/// Clean URL → output path mapping with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniqueAssets {
    assets: BTreeMap<String, PathBuf>,
}

impl UniqueAssets {
    /// Number of distinct clean URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns true when no asset survived resolution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Output path recorded for `url`, if any.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&Path> {
        self.assets.get(url).map(PathBuf::as_path)
    }

    /// Iterates `(clean URL, relative output path)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.assets
            .iter()
            .map(|(url, path)| (url.as_str(), path.as_path()))
    }

    /// Converts every entry into a download task rooted at `root`.
    #[must_use]
    pub fn into_tasks(self, root: &Path) -> Vec<DownloadTask> {
        self.assets
            .into_iter()
            .map(|(url, path)| AssetRecord {
                url,
                output_path: path,
            })
            .map(|record| record.into_task(root))
            .collect()
    }
}

impl FromIterator<AssetRecord> for UniqueAssets {
    fn from_iter<I: IntoIterator<Item = AssetRecord>>(iter: I) -> Self {
        let mut assets = BTreeMap::new();
        for record in iter {
            // Last write wins; colliding keys are textually identical URLs.
            assets.insert(record.url, record.output_path);
        }
        Self { assets }
    }
}

/// Collapses resolved records into a unique URL → path mapping.
#[must_use]
pub fn dedupe(records: impl IntoIterator<Item = AssetRecord>) -> UniqueAssets {
    records.into_iter().collect()
}
