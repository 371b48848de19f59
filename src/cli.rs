//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Bulk-download every file attached to your Google Classroom courses.
///
/// Files from announcements, posted materials, and assignments land under
/// `<OUTPUT>/courses/<course name>/`, skipping files already present.
/// Outcomes are written to DOWNLOADED.txt, SKIPPED_DOWNLOADS.txt, and
/// FAILED_DOWNLOADS.txt under the same root.
#[derive(Parser, Debug)]
#[command(name = "classroom-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Directory to save courses into (a `courses/` subfolder is created)
    pub output: Option<PathBuf>,

    /// OAuth client secret file for the interactive authorization flow
    #[arg(long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
