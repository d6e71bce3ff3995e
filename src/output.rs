//! Final console report: run summary and verification block.
//!
//! Line builders are pure so the wording can be tested; the `print_*`
//! functions write them to stdout.

use std::time::Duration;

use eyes_mirror::VerificationReport;
use eyes_mirror::download::ProgressSnapshot;

/// Summary printed after a run that ran to completion.
pub fn completion_lines(elapsed: Duration, snapshot: &ProgressSnapshot) -> Vec<String> {
    vec![
        "Download complete!".to_string(),
        format!("Time elapsed: {:.2} seconds", elapsed.as_secs_f64()),
        format!("Files downloaded: {}/{}", snapshot.downloaded, snapshot.total),
        format!("Errors: {}", snapshot.errors),
    ]
}

/// Summary printed after the user interrupted the run.
pub fn cancellation_lines(snapshot: &ProgressSnapshot) -> Vec<String> {
    vec![
        "Download cancelled by user.".to_string(),
        format!("Files downloaded: {}/{}", snapshot.downloaded, snapshot.total),
        format!("Errors: {}", snapshot.errors),
    ]
}

/// Failure log followed by the essential-file check.
pub fn verification_lines(report: &VerificationReport) -> Vec<String> {
    let mut lines = vec!["Verifying downloaded files...".to_string()];

    lines.extend(report.failures.iter().map(|failure| {
        format!(
            "  - Failed: {} (Error: {})",
            failure.path.display(),
            failure.message
        )
    }));
    lines.extend(
        report
            .missing
            .iter()
            .map(|path| format!("  - Missing essential file: {}", path.display())),
    );

    lines.push(String::new());
    if report.missing.is_empty() {
        lines.push("All essential files have been downloaded successfully.".to_string());
    } else {
        lines.push(format!(
            "Warning: {} essential files are missing.",
            report.missing.len()
        ));
        lines.push("The application might not work properly.".to_string());
    }
    lines
}

pub fn print_completion(elapsed: Duration, snapshot: &ProgressSnapshot) {
    print_block(&completion_lines(elapsed, snapshot));
}

pub fn print_cancellation(snapshot: &ProgressSnapshot) {
    print_block(&cancellation_lines(snapshot));
}

pub fn print_verification(report: &VerificationReport) {
    print_block(&verification_lines(report));
}

fn print_block(lines: &[String]) {
    println!();
    for line in lines {
        println!("{line}");
    }
}
