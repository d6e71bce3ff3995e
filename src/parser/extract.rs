//! Asset URL extraction from downloaded JavaScript and CSS bundles.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, trace};
use url::Url;

use super::error::ExtractError;
use crate::site::SiteProfile;

/// Quoted string literal that looks like a path to a file.
///
/// The literal starts with `/` or an `http:`/`https:` scheme, contains at
/// least one further `/`, and ends in `.<extension>` right before the
/// closing quote. Backslash escapes are allowed before the last `/`.
#[allow(clippy::expect_used)]
static QUOTED_ASSET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']((?:/|https?:)(?:[^"'\\]|\\.)*/[^"']*\.[a-zA-Z0-9]+)["']"#)
        .expect("quoted asset regex is valid") // Static pattern, safe to panic
});

/// CSS `url(...)` reference; the capture may still carry quotes.
#[allow(clippy::expect_used)]
static CSS_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"url\(([^)]+)\)").expect("CSS url() regex is valid") // Static pattern, safe to panic
});

/// Finds raw asset references in bundle text.
///
/// Quoted path literals are matched in every file; `url(...)` references
/// are matched as well when `is_css` is set, with surrounding quote
/// characters stripped. The result is unordered and may contain
/// duplicates or false positives; nothing is resolved here.
///
/// # Examples
///
/// ```
/// use eyes_mirror::parser::extract_urls;
///
/// let urls = extract_urls(r#"load("/assets/static/foo.png")"#, false);
/// assert_eq!(urls, ["/assets/static/foo.png"]);
///
/// let urls = extract_urls("a { background: url('images/bg.jpg') }", true);
/// assert_eq!(urls, ["images/bg.jpg"]);
/// ```
#[must_use]
pub fn extract_urls(text: &str, is_css: bool) -> Vec<String> {
    let mut urls: Vec<String> = QUOTED_ASSET_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    if is_css {
        urls.extend(
            CSS_URL_PATTERN
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim_matches(['"', '\'']).to_string()),
        );
    }

    urls
}

/// Turns a raw reference into an absolute URL string.
///
/// - `/path` (and protocol-relative `//host/path`) resolves against the site origin
/// - anything starting with `http` is kept as written
/// - everything else resolves against `base`
///
/// Returns `None` when the reference cannot be joined.
#[must_use]
pub fn absolutize(raw: &str, site: &SiteProfile, base: &Url) -> Option<String> {
    let joined = if raw.starts_with('/') {
        site.origin().join(raw)
    } else if raw.starts_with("http") {
        return Some(raw.to_string());
    } else {
        base.join(raw)
    };

    match joined {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            trace!(raw = %raw, error = %e, "dropping unjoinable reference");
            None
        }
    }
}

/// Returns true when the file is scanned as CSS (by extension).
#[must_use]
pub fn is_css_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
}

/// Reads a downloaded bundle and returns the absolute asset URLs it references.
///
/// Invalid UTF-8 is decoded lossily so one bad byte does not hide the rest
/// of the bundle.
///
/// # Errors
///
/// Returns [`ExtractError::Read`] if the file cannot be read.
#[instrument(skip(site, base), fields(path = %path.display()))]
pub async fn extract_asset_urls(
    path: &Path,
    base: &Url,
    site: &SiteProfile,
) -> Result<Vec<String>, ExtractError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ExtractError::read(path, e))?;
    let text = String::from_utf8_lossy(&bytes);

    let urls: Vec<String> = extract_urls(&text, is_css_path(path))
        .iter()
        .filter_map(|raw| absolutize(raw, site, base))
        .collect();

    debug!(count = urls.len(), "extracted asset references");
    Ok(urls)
}
