//! The mirrored site: where it lives and which files make up its entry points.
//!
//! A [`SiteProfile`] pins the application base URL, the origin used for
//! root-relative references, the primary host and the accepted domain
//! suffix. The fixed file lists (seeds, scanned bundles, essential files,
//! pre-created directories) describe the Eyes on the Solar System layout.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Application base URL that is mirrored by default.
pub const DEFAULT_BASE_URL: &str = "https://eyes.nasa.gov/apps/solar-system/";

/// Hosts whose name ends with this suffix are in scope by default.
pub const DEFAULT_DOMAIN_SUFFIX: &str = "nasa.gov";

/// Main HTML, JavaScript and CSS bundles: `(remote path, local path)`.
///
/// The remote path is relative to the base URL; the empty path is the
/// application page itself.
pub const MAIN_FILES: &[(&str, &str)] = &[
    ("", "index.html"),
    ("config.js", "config.js"),
    ("commons.js", "commons.js"),
    ("preload.js", "preload.js"),
    ("vendors.js", "vendors.js"),
    ("app.js", "app.js"),
    ("preload.css", "preload.css"),
    ("vendors.css", "vendors.css"),
    ("app.css", "app.css"),
];

/// Favicons, manifest and social preview image.
pub const FAVICON_FILES: &[(&str, &str)] = &[
    ("apple-touch-icon.png", "apple-touch-icon.png"),
    ("favicon-32x32.png", "favicon-32x32.png"),
    ("favicon-194x194.png", "favicon-194x194.png"),
    ("android-chrome-192x192.png", "android-chrome-192x192.png"),
    ("favicon-16x16.png", "favicon-16x16.png"),
    ("site.webmanifest", "site.webmanifest"),
    ("safari-pinned-tab.svg", "safari-pinned-tab.svg"),
    ("favicon.ico", "favicon.ico"),
    ("browserconfig.xml", "browserconfig.xml"),
    ("og_img.jpg", "og_img.jpg"),
];

/// Assets the page preloads before any bundle runs.
pub const PRELOADED_ASSETS: &[(&str, &str)] = &[
    (
        "assets/default/svg/nasa_logo.svg",
        "assets/default/svg/nasa_logo.svg",
    ),
    (
        "assets/default/fonts/Metropolis-SemiBold.woff",
        "assets/default/fonts/Metropolis-SemiBold.woff",
    ),
];

/// Downloaded bundles scanned for embedded asset URLs.
pub const SCANNED_FILES: &[&str] = &[
    "app.js",
    "vendors.js",
    "commons.js",
    "preload.js",
    "app.css",
    "vendors.css",
    "preload.css",
];

/// Files whose presence is checked after every run.
pub const ESSENTIAL_FILES: &[&str] = &[
    "index.html",
    "config.js",
    "commons.js",
    "preload.js",
    "vendors.js",
    "app.js",
    "preload.css",
    "vendors.css",
    "app.css",
    "config.local.js",
    "assets/default/svg/nasa_logo.svg",
];

/// Directories created under the mirror root before anything is fetched.
pub const MIRROR_DIRECTORIES: &[&str] = &[
    "assets/static",
    "assets/dynamic",
    "server/spice",
    "assets/default/svg",
    "assets/default/fonts",
    "external",
];

/// Errors raised while building a [`SiteProfile`].
#[derive(Debug, Error)]
pub enum SiteError {
    /// Base URL failed to parse or is not an http(s) URL with a host.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Domain suffix is empty.
    #[error("domain suffix must not be empty")]
    EmptyDomainSuffix,
}

/// A named batch of seed downloads, fetched sequentially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedGroup {
    /// Heading shown when the group starts.
    pub label: &'static str,
    /// `(absolute URL, path relative to the mirror root)` pairs.
    pub entries: Vec<(String, PathBuf)>,
}

/// A downloaded bundle to scan and the base its relative URLs resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// Path of the bundle relative to the mirror root.
    pub path: PathBuf,
    /// Base URL for relative references found in the bundle.
    pub base_url: Url,
}

/// Addressing information for the mirrored site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    base_url: Url,
    origin: Url,
    domain_suffix: String,
}

impl SiteProfile {
    /// Builds a profile from a base URL and accepted domain suffix.
    ///
    /// A missing trailing `/` is added to the base URL so relative seed
    /// paths land inside the application directory.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the URL does not parse, is not http(s),
    /// has no host, or the suffix is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use eyes_mirror::site::SiteProfile;
    ///
    /// let site = SiteProfile::new("https://eyes.nasa.gov/apps/solar-system", "nasa.gov").unwrap();
    /// assert_eq!(site.base_url().as_str(), "https://eyes.nasa.gov/apps/solar-system/");
    /// assert_eq!(site.origin().as_str(), "https://eyes.nasa.gov/");
    /// ```
    pub fn new(base_url: &str, domain_suffix: &str) -> Result<Self, SiteError> {
        let invalid = |reason: &str| SiteError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: reason.to_string(),
        };

        let mut parsed = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host"));
        }
        parsed.set_query(None);
        parsed.set_fragment(None);
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        let origin = parsed.join("/").map_err(|e| invalid(&e.to_string()))?;

        let domain_suffix = domain_suffix.trim().trim_start_matches('.').to_ascii_lowercase();
        if domain_suffix.is_empty() {
            return Err(SiteError::EmptyDomainSuffix);
        }

        Ok(Self {
            base_url: parsed,
            origin,
            domain_suffix,
        })
    }

    /// Profile for `https://eyes.nasa.gov/apps/solar-system/`.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in constants are malformed.
    pub fn eyes_on_the_solar_system() -> Result<Self, SiteError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_DOMAIN_SUFFIX)
    }

    /// Application base URL (always ends in `/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Scheme, host and port of the base URL with path `/`.
    #[must_use]
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Accepted host suffix.
    #[must_use]
    pub fn domain_suffix(&self) -> &str {
        &self.domain_suffix
    }

    /// Host and optional explicit port of the primary host, e.g. `eyes.nasa.gov`.
    #[must_use]
    pub fn primary_netloc(&self) -> String {
        netloc(&self.base_url)
    }

    /// Seed batches in download order: main files, favicon files, preloaded assets.
    #[must_use]
    pub fn seed_groups(&self) -> Vec<SeedGroup> {
        [
            ("main files", MAIN_FILES),
            ("favicon files", FAVICON_FILES),
            ("preloaded assets", PRELOADED_ASSETS),
        ]
        .into_iter()
        .map(|(label, files)| SeedGroup {
            label,
            entries: files
                .iter()
                .map(|(remote, local)| (self.seed_url(remote), PathBuf::from(local)))
                .collect(),
        })
        .collect()
    }

    /// Bundles to scan for asset references, all resolved against the base URL.
    #[must_use]
    pub fn scan_targets(&self) -> Vec<ScanTarget> {
        SCANNED_FILES
            .iter()
            .map(|file| ScanTarget {
                path: PathBuf::from(file),
                base_url: self.base_url.clone(),
            })
            .collect()
    }

    fn seed_url(&self, remote: &str) -> String {
        // Seed paths are plain relative file names; concatenation matches
        // how the site itself links them.
        format!("{}{remote}", self.base_url)
    }
}

/// `host[:port]` of a URL; the port is omitted when it is the scheme default.
#[must_use]
pub fn netloc(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
