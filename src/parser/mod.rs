//! Asset discovery: finding asset references in downloaded bundles and
//! mapping them onto mirror paths.
//!
//! Extraction is deliberately loose (regex over JavaScript and CSS text);
//! resolution is where references are normalized, scoped to the accepted
//! domain suffix and deduplicated by their query-less URL.
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use eyes_mirror::parser::{absolutize, dedupe, extract_urls, resolve_asset};
//! use eyes_mirror::site::SiteProfile;
//!
//! let site = SiteProfile::eyes_on_the_solar_system().unwrap();
//! let raw = extract_urls(r#"a="/assets/static/foo.png?v=1";b='/assets/static/foo.png'"#, false);
//! let unique = dedupe(
//!     raw.iter()
//!         .filter_map(|r| absolutize(r, &site, site.base_url()))
//!         .filter_map(|url| resolve_asset(&url, &site)),
//! );
//! assert_eq!(unique.len(), 1);
//! ```

mod error;
mod extract;
mod resolve;

pub use error::ExtractError;
pub use extract::{absolutize, extract_asset_urls, extract_urls, is_css_path};
pub use resolve::{AssetRecord, EXTERNAL_DIR, UniqueAssets, dedupe, resolve_asset};
