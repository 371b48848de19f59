//! Existing-file discovery for skip-if-present decisions.

use std::collections::HashSet;
use std::io;
use std::path::Path;

/// Recursively collects the base file names under `folder`.
///
/// Depth-unbounded; directories contribute their contents, not their own
/// names. The set is rebuilt per material collection rather than maintained
/// incrementally, which is fine at course-folder scale.
///
/// # Errors
///
/// Returns an I/O error when a directory cannot be read.
pub fn existing_file_names(folder: &Path) -> io::Result<HashSet<String>> {
    let mut names = HashSet::new();
    collect(folder, &mut names)?;
    Ok(names)
}

fn collect(dir: &Path, names: &mut HashSet<String>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect(&path, names)?;
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.insert(name.to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_file_names_flat_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"x").unwrap();

        let names = existing_file_names(dir.path()).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("a.pdf"));
        assert!(names.contains("b.txt"));
    }

    #[test]
    fn test_existing_file_names_recurses_into_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("unit1").join("week2");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join("notes.docx"), b"x").unwrap();
        std::fs::write(dir.path().join("top.pdf"), b"x").unwrap();

        let names = existing_file_names(dir.path()).unwrap();
        assert!(names.contains("notes.docx"));
        assert!(names.contains("top.pdf"));
        // Directory names themselves are not file entries.
        assert!(!names.contains("unit1"));
        assert!(!names.contains("week2"));
    }

    #[test]
    fn test_existing_file_names_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let names = existing_file_names(dir.path()).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_existing_file_names_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(existing_file_names(&missing).is_err());
    }
}
