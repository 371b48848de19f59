//! Course blacklist: an operator-maintained list of course names to exclude.
//!
//! The file is newline-delimited, created empty when absent, and never
//! truncated by the program. It is re-read before each listing pass so an
//! edit made during the interactive pause takes effect downstream.

use std::fs::OpenOptions;
use std::io::{self, Read};
use std::path::Path;

use crate::google::Course;

/// Reads the blacklist, creating an empty file when none exists.
///
/// Blank lines are kept out of the result; matching is exact otherwise, so
/// leading/trailing whitespace in an entry is significant.
///
/// # Errors
///
/// Returns an I/O error when the file cannot be opened or read.
pub fn read_blacklist(path: &Path) -> io::Result<Vec<String>> {
    // append + read keeps existing content intact while creating on demand
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .read(true)
        .open(path)?;

    let mut content = String::new();
    file.read_to_string(&mut content)?;

    Ok(content
        .lines()
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Returns the courses whose name does not exactly match a blacklist entry.
#[must_use]
pub fn filter_courses(courses: Vec<Course>, blacklist: &[String]) -> Vec<Course> {
    courses
        .into_iter()
        .filter(|course| !blacklist.iter().any(|entry| *entry == course.name))
        .collect()
}
