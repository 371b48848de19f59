//! Resolution of a material to a (Drive object id, display name) pair.
//!
//! Non-drive attachments (links, forms, videos) are an expected skip. A
//! drive-file attachment missing its id or title is an unexpected response
//! shape and is logged before being skipped, so the two cases stay
//! distinguishable in the run log.

use tracing::{debug, info, warn};

use crate::google::{DriveClient, Material};
use crate::mime::{extension_for_mime, mime_for_extension, resolve_export};
use crate::sanitize::sanitize;

/// Titles with this prefix carry a placeholder primary id; the real object
/// id is re-derived from the share link.
const TEMPLATE_PREFIX: &str = "[Template]";

/// A material resolved to something the downloader can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Drive object id to fetch.
    pub id: String,
    /// Local file name the object will be saved under.
    pub name: String,
}

/// Resolves a material to its Drive object id and display name.
///
/// Returns `None` when the material has no recognized attachment (expected)
/// or when the attachment's shape is unusable (logged at warn). The display
/// name comes from a Drive metadata lookup with the mime extension policy
/// applied; the attachment title is the fallback when that lookup fails.
pub async fn resolve(material: &Material, drive: &DriveClient) -> Option<ResolvedFile> {
    let Some(shared) = &material.drive_file else {
        debug!("material has no drive-file attachment, skipping");
        return None;
    };
    let Some(file_ref) = &shared.drive_file else {
        warn!("drive-file attachment missing inner object, skipping");
        return None;
    };
    let (Some(id), Some(title)) = (&file_ref.id, &file_ref.title) else {
        warn!(
            id = file_ref.id.as_deref(),
            title = file_ref.title.as_deref(),
            "drive-file attachment missing id or title, skipping"
        );
        return None;
    };

    let mut id = id.clone();
    if title.starts_with(TEMPLATE_PREFIX) {
        match file_ref.alternate_link.as_deref().and_then(share_link_id) {
            Some(link_id) => {
                info!(
                    link = file_ref.alternate_link.as_deref().unwrap_or_default(),
                    "template item, downloading {link_id} via its share link instead"
                );
                id = link_id;
            }
            None => warn!(
                title = %title,
                "template item without a parsable share link, keeping primary id"
            ),
        }
    }

    let name = match resolve_file_name(drive, &id).await {
        Some(name) => name,
        None => title.clone(),
    };

    Some(ResolvedFile { id, name })
}

/// Extracts the object id between `/d/` and the following `/` of a canonical
/// Drive share link.
#[must_use]
pub fn share_link_id(link: &str) -> Option<String> {
    let start = link.rfind("/d/")? + 3;
    let rest = &link[start..];
    let end = rest.find('/').unwrap_or(rest.len());
    (!rest[..end].is_empty()).then(|| rest[..end].to_string())
}

/// Looks up the object's current name and applies the extension policy.
///
/// Export-table hits replace the extension with the export format's; other
/// mime types get a guessed extension appended only when the existing one
/// does not already match the reported type. Returns `None` (caller falls
/// back to the attachment title) when the lookup fails.
pub async fn resolve_file_name(drive: &DriveClient, file_id: &str) -> Option<String> {
    let meta = match drive.get_metadata(file_id).await {
        Ok(meta) => meta,
        Err(error) => {
            warn!(file_id, %error, "file name lookup failed, falling back to title");
            return None;
        }
    };

    let name = sanitize(&meta.name);
    if meta.mime_type.is_empty() {
        return Some(name);
    }

    if let Some(format) = resolve_export(&meta.mime_type) {
        let (stem, _ext) = split_extension(&name);
        return Some(format!("{stem}{}", format.extension));
    }

    if let Some(guessed) = extension_for_mime(&meta.mime_type) {
        let (_stem, existing) = split_extension(&name);
        let already_matches = mime_for_extension(existing)
            .is_some_and(|existing_mime| existing_mime == meta.mime_type);
        if !already_matches {
            return Some(format!("{name}{guessed}"));
        }
    }

    Some(name)
}

/// Splits a file name into (stem, extension-with-dot). A name with no dot,
/// or only leading dots, has an empty extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && name[..idx].chars().any(|c| c != '.') => {
            (&name[..idx], &name[idx..])
        }
        _ => (name, ""),
    }
}
