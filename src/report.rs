//! End-of-run outcome reports.
//!
//! The three outcome sequences are written verbatim, one labeled entry per
//! line, to fixed filenames under the run root, overwriting any prior run.

use std::io;
use std::path::Path;

use crate::config::{DOWNLOADED_REPORT, FAILED_REPORT, RunConfig, SKIPPED_REPORT};
use crate::pipeline::RunOutcomes;

/// Writes the three reports under the run root.
///
/// # Errors
///
/// Returns an I/O error when any report file cannot be written.
pub fn write_reports(config: &RunConfig, outcomes: &RunOutcomes) -> io::Result<()> {
    write_list(&config.report_path(DOWNLOADED_REPORT), &outcomes.downloaded)?;
    write_list(&config.report_path(SKIPPED_REPORT), &outcomes.skipped)?;
    write_list(&config.report_path(FAILED_REPORT), &outcomes.failed)?;
    Ok(())
}

fn write_list(path: &Path, entries: &[String]) -> io::Result<()> {
    let mut content = entries.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content)
}
