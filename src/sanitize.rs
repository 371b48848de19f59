//! Filename sanitization for course and file titles.
//!
//! Remote titles are arbitrary text; local paths are not. Every character
//! from a fixed forbidden set is substituted with `_` so that a given title
//! always maps to the same on-disk name.

/// Characters that may not appear in a local file or directory name.
///
/// The space is included deliberately: course folders double as shell-typed
/// paths and the original tree convention is underscore-separated names.
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', ' '];

/// Replaces every forbidden character in `title` with `_`.
///
/// The mapping is total, deterministic, and idempotent: characters are
/// substituted one-for-one, never collapsed or trimmed, so repeated
/// application is a no-op and equal inputs always produce equal outputs.
#[must_use]
pub fn sanitize(title: &str) -> String {
    title
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect()
}
