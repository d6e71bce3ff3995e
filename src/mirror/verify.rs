//! Post-run check of the mirror: failure log plus essential-file presence.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::download::FailedDownload;

/// Result of checking a mirror root after a run.
///
/// Neither failures nor missing files change the exit status; the report
/// exists so the caller can show them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Every fetch failure recorded during the run, in recording order.
    pub failures: Vec<FailedDownload>,
    /// Essential files (relative to the root) that are not present.
    pub missing: Vec<PathBuf>,
}

impl VerificationReport {
    /// Returns true when nothing failed and nothing is missing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.missing.is_empty()
    }
}

/// Checks which of `essential` exist under `root` and bundles the result
/// with the run's failure log.
#[must_use]
pub fn verify_mirror(
    root: &Path,
    essential: &[&str],
    failures: Vec<FailedDownload>,
) -> VerificationReport {
    let missing: Vec<PathBuf> = essential
        .iter()
        .map(PathBuf::from)
        .filter(|relative| !root.join(relative).exists())
        .collect();

    for relative in &missing {
        warn!(path = %relative.display(), "essential file missing");
    }
    debug!(
        failures = failures.len(),
        missing = missing.len(),
        "verification finished"
    );

    VerificationReport { failures, missing }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::site::ESSENTIAL_FILES;
    use tempfile::TempDir;

    #[test]
    fn test_empty_root_reports_every_essential_file() {
        let temp_dir = TempDir::new().unwrap();

        let report = verify_mirror(temp_dir.path(), ESSENTIAL_FILES, Vec::new());

        assert_eq!(report.missing.len(), ESSENTIAL_FILES.len());
        assert_eq!(report.missing[0], PathBuf::from("index.html"));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_present_nested_file_is_not_missing() {
        let temp_dir = TempDir::new().unwrap();
        let logo = temp_dir.path().join("assets/default/svg/nasa_logo.svg");
        std::fs::create_dir_all(logo.parent().unwrap()).unwrap();
        std::fs::write(&logo, "<svg/>").unwrap();
        std::fs::write(temp_dir.path().join("index.html"), "<html>").unwrap();

        let report = verify_mirror(
            temp_dir.path(),
            &["index.html", "assets/default/svg/nasa_logo.svg", "app.js"],
            Vec::new(),
        );

        assert_eq!(report.missing, [PathBuf::from("app.js")]);
    }

    #[test]
    fn test_failures_are_carried_into_the_report() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("index.html"), "<html>").unwrap();
        let failure = FailedDownload::new(
            "https://eyes.nasa.gov/apps/solar-system/og_img.jpg",
            temp_dir.path().join("og_img.jpg"),
            "Status code 404",
        );

        let report = verify_mirror(temp_dir.path(), &["index.html"], vec![failure.clone()]);

        assert!(report.missing.is_empty());
        assert_eq!(report.failures, [failure]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_clean_report() {
        let temp_dir = TempDir::new().unwrap();
        assert!(verify_mirror(temp_dir.path(), &[], Vec::new()).is_clean());
    }
}
