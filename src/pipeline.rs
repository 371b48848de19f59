//! The course pipeline: enumeration, blacklist filtering, the interactive
//! blacklist-edit pause, per-course material processing, and the final
//! reports.
//!
//! Everything runs on one logical thread: every remote call is awaited to
//! completion before the next begins. Errors during a single material's
//! processing are downgraded to report entries; collection-level and
//! listing-level failures abort the run.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::blacklist::{filter_courses, read_blacklist};
use crate::config::RunConfig;
use crate::download::Downloader;
use crate::google::{ApiError, ClassroomClient, Course, CourseItem, DriveClient};
use crate::locate;
use crate::report::write_reports;
use crate::sanitize::sanitize;
use crate::scan::existing_file_names;

/// Which collection a material came from; labels the report entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Course stream announcement attachments.
    Announcement,
    /// Posted course-work materials.
    WorkMaterial,
    /// Assignment attachments.
    Work,
}

impl MaterialKind {
    /// Report label for this kind.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Announcement => "Announcement",
            Self::WorkMaterial => "WorkMaterial",
            Self::Work => "Work",
        }
    }
}

/// The three outcome sequences of a run.
///
/// Every material that resolves to an (id, name) pair lands in exactly one
/// of them, in processing order.
#[derive(Debug, Default, Clone)]
pub struct RunOutcomes {
    /// Successfully downloaded files.
    pub downloaded: Vec<String>,
    /// Files skipped because the name already existed locally.
    pub skipped: Vec<String>,
    /// Failed downloads with their reason strings.
    pub failed: Vec<String>,
}

impl RunOutcomes {
    /// Records a successful download.
    pub fn record_downloaded(&mut self, kind: MaterialKind, course: &str, file: &str) {
        self.downloaded.push(entry(kind, course, file));
    }

    /// Records a skip due to an existing local file.
    pub fn record_skipped(&mut self, kind: MaterialKind, course: &str, file: &str) {
        self.skipped.push(entry(kind, course, file));
    }

    /// Records a failure with its reason detail.
    pub fn record_failed(&mut self, kind: MaterialKind, course: &str, detail: &str) {
        self.failed.push(entry(kind, course, detail));
    }

    /// Total outcomes recorded across the three sequences.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.skipped.len() + self.failed.len()
    }
}

fn entry(kind: MaterialKind, course: &str, detail: &str) -> String {
    format!("{}: {course}: {detail}", kind.label())
}

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A listing or collection fetch failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Filesystem access under the run root failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Runs the whole pipeline and writes the reports.
///
/// `wait_for_edit` is the blocking await-operator-input stage between the
/// two listing passes; the blacklist is re-read after it returns, so edits
/// made during the pause take effect for the second pass onward.
///
/// # Errors
///
/// Returns [`PipelineError`] when course listing, a collection fetch, or
/// filesystem access under the run root fails. Per-material failures do not
/// abort the run; they are recorded in the outcome lists.
pub async fn run_pipeline<F>(
    config: &RunConfig,
    classroom: &ClassroomClient,
    drive: &DriveClient,
    wait_for_edit: F,
) -> Result<RunOutcomes, PipelineError>
where
    F: FnOnce() -> io::Result<()>,
{
    std::fs::create_dir_all(config.root())?;

    let courses = list_filtered_courses(config, classroom).await?;
    print_course_list("Course list", &courses);

    wait_for_edit()?;

    let courses = list_filtered_courses(config, classroom).await?;
    print_course_list("Updated Course list", &courses);

    let downloader = Downloader::new(drive.clone());
    let mut outcomes = RunOutcomes::default();

    for course in &courses {
        let course_name = sanitize(&course.name);
        print_banner(&format!("Downloading files for {course_name}"));

        let course_dir = config.course_dir(&course.name);
        std::fs::create_dir_all(&course_dir)?;

        let announcements = classroom.list_announcements(&course.id).await?;
        let work_materials = classroom.list_work_materials(&course.id).await?;
        let course_work = classroom.list_course_work(&course.id).await?;

        process_collection(
            MaterialKind::Announcement,
            &announcements,
            &course_name,
            &course_dir,
            drive,
            &downloader,
            &mut outcomes,
        )
        .await?;
        process_collection(
            MaterialKind::WorkMaterial,
            &work_materials,
            &course_name,
            &course_dir,
            drive,
            &downloader,
            &mut outcomes,
        )
        .await?;
        process_collection(
            MaterialKind::Work,
            &course_work,
            &course_name,
            &course_dir,
            drive,
            &downloader,
            &mut outcomes,
        )
        .await?;
    }

    write_reports(config, &outcomes)?;
    info!(
        downloaded = outcomes.downloaded.len(),
        skipped = outcomes.skipped.len(),
        failed = outcomes.failed.len(),
        "pipeline complete"
    );
    Ok(outcomes)
}

/// One listing pass: fetch courses, re-read the blacklist, filter.
async fn list_filtered_courses(
    config: &RunConfig,
    classroom: &ClassroomClient,
) -> Result<Vec<Course>, PipelineError> {
    let all = classroom.list_courses().await?;
    let blacklist = read_blacklist(&config.blacklist_path())?;
    let courses = filter_courses(all, &blacklist);
    debug!(
        kept = courses.len(),
        blacklisted = blacklist.len(),
        "filtered course list"
    );
    Ok(courses)
}

/// Processes one material collection of one course.
///
/// The existing-files set is rebuilt fresh for each collection; membership
/// decides skip-vs-download. Items without materials and materials without a
/// usable drive-file reference are skipped per-item.
async fn process_collection(
    kind: MaterialKind,
    items: &[CourseItem],
    course_name: &str,
    course_dir: &Path,
    drive: &DriveClient,
    downloader: &Downloader,
    outcomes: &mut RunOutcomes,
) -> Result<(), PipelineError> {
    if items.is_empty() {
        return Ok(());
    }

    let existing: HashSet<String> = existing_file_names(course_dir)?;

    for item in items {
        let Some(materials) = &item.materials else {
            debug!(kind = kind.label(), "item carries no materials, skipping");
            continue;
        };

        for material in materials {
            let Some(resolved) = locate::resolve(material, drive).await else {
                continue;
            };

            if existing.contains(&resolved.name) {
                println!("{} already exists - skipping", resolved.name);
                outcomes.record_skipped(kind, course_name, &resolved.name);
            } else {
                println!("DOWNLOADING {}: {}", kind.label(), resolved.name);
                match downloader.fetch(&resolved.id, &resolved.name, course_dir).await {
                    None => outcomes.record_downloaded(kind, course_name, &resolved.name),
                    Some(reason) => outcomes.record_failed(kind, course_name, &reason),
                }
            }
        }
    }

    Ok(())
}

/// Prints a `#`-framed banner followed by one course name per line.
fn print_course_list(title: &str, courses: &[Course]) {
    print_banner(title);
    for course in courses {
        println!("{}", course.name);
    }
}

fn print_banner(text: &str) {
    let ruler = "#".repeat(text.len());
    println!("\n{ruler}");
    println!("{text}");
    println!("{ruler}\n");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_material_kind_labels() {
        assert_eq!(MaterialKind::Announcement.label(), "Announcement");
        assert_eq!(MaterialKind::WorkMaterial.label(), "WorkMaterial");
        assert_eq!(MaterialKind::Work.label(), "Work");
    }

    #[test]
    fn test_outcomes_entry_format() {
        let mut outcomes = RunOutcomes::default();
        outcomes.record_downloaded(MaterialKind::Announcement, "Math_101", "notes.pdf");
        assert_eq!(outcomes.downloaded[0], "Announcement: Math_101: notes.pdf");
    }

    #[test]
    fn test_outcomes_total_sums_all_sequences() {
        let mut outcomes = RunOutcomes::default();
        outcomes.record_downloaded(MaterialKind::Work, "A", "x");
        outcomes.record_skipped(MaterialKind::Work, "A", "y");
        outcomes.record_skipped(MaterialKind::Work, "A", "z");
        outcomes.record_failed(MaterialKind::Work, "A", "w: [unknown]");
        assert_eq!(outcomes.total(), 4);
        assert_eq!(outcomes.downloaded.len(), 1);
        assert_eq!(outcomes.skipped.len(), 2);
        assert_eq!(outcomes.failed.len(), 1);
    }
}
