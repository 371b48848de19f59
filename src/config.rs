//! Run configuration: the output root and every well-known path under it.
//!
//! The output root is chosen once at startup and threaded explicitly through
//! every component that touches the filesystem; nothing reads it from global
//! state.

use std::path::{Path, PathBuf};

use crate::sanitize::sanitize;

/// Blacklist file name under the run root.
pub const BLACKLIST_FILE: &str = "course_blacklist.txt";

/// Report file names under the run root.
pub const DOWNLOADED_REPORT: &str = "DOWNLOADED.txt";
pub const SKIPPED_REPORT: &str = "SKIPPED_DOWNLOADS.txt";
pub const FAILED_REPORT: &str = "FAILED_DOWNLOADS.txt";

/// Paths for one downloader run.
///
/// `root` is `<output dir>/courses/`; credential files, the blacklist, the
/// reports, and every course folder live beneath it.
#[derive(Debug, Clone)]
pub struct RunConfig {
    root: PathBuf,
    credentials_path: PathBuf,
}

impl RunConfig {
    /// Builds a configuration rooted at `<output_dir>/courses/`.
    ///
    /// `credentials_path` is the OAuth client-secret file used for the
    /// interactive authorization flow.
    #[must_use]
    pub fn new(output_dir: &Path, credentials_path: PathBuf) -> Self {
        Self {
            root: output_dir.join("courses"),
            credentials_path,
        }
    }

    /// The run root (`<output dir>/courses/`).
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The OAuth client-secret file for interactive authorization.
    #[must_use]
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Persisted token file for a scope set, e.g. `token-classroom.json`.
    #[must_use]
    pub fn token_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// The operator-maintained course blacklist file.
    #[must_use]
    pub fn blacklist_path(&self) -> PathBuf {
        self.root.join(BLACKLIST_FILE)
    }

    /// Local folder for a course, named by its sanitized title.
    #[must_use]
    pub fn course_dir(&self, course_name: &str) -> PathBuf {
        self.root.join(sanitize(course_name))
    }

    /// Path of one of the three run reports.
    #[must_use]
    pub fn report_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig::new(Path::new("/data/out"), PathBuf::from("credentials.json"))
    }

    #[test]
    fn test_root_is_courses_subdir() {
        assert_eq!(config().root(), Path::new("/data/out/courses"));
    }

    #[test]
    fn test_course_dir_uses_sanitized_name() {
        let dir = config().course_dir("Math: Algebra 1");
        assert_eq!(dir, Path::new("/data/out/courses/Math__Algebra_1"));
    }

    #[test]
    fn test_course_dir_is_stable_for_equal_names() {
        let c = config();
        assert_eq!(c.course_dir("CS 101"), c.course_dir("CS 101"));
    }

    #[test]
    fn test_well_known_paths() {
        let c = config();
        assert_eq!(
            c.blacklist_path(),
            Path::new("/data/out/courses/course_blacklist.txt")
        );
        assert_eq!(
            c.token_path("token-drive.json"),
            Path::new("/data/out/courses/token-drive.json")
        );
        assert_eq!(
            c.report_path(DOWNLOADED_REPORT),
            Path::new("/data/out/courses/DOWNLOADED.txt")
        );
    }
}
