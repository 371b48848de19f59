//! Mime resolution for Google-native documents and plain content types.
//!
//! Google-native formats (Docs, Drawings, Slides, Sheets) cannot be fetched
//! directly; they must be exported to an interchange format. Everything else
//! downloads as-is, with a best-effort extension guess from the reported
//! content type.

/// Export target for a Google-native document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFormat {
    /// Mime type to request from the export endpoint.
    pub export_mime: &'static str,
    /// File extension matching the exported format (with leading dot).
    pub extension: &'static str,
}

/// Maps a Google-native document mime type to its export format.
///
/// Returns `None` for anything outside the fixed four-entry table, which
/// signals the caller to fetch the raw content instead of exporting.
#[must_use]
pub fn resolve_export(mime: &str) -> Option<ExportFormat> {
    match mime {
        "application/vnd.google-apps.document" => Some(ExportFormat {
            export_mime:
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            extension: ".docx",
        }),
        "application/vnd.google-apps.drawing" => Some(ExportFormat {
            export_mime: "application/pdf",
            extension: ".pdf",
        }),
        "application/vnd.google-apps.presentation" => Some(ExportFormat {
            export_mime:
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            extension: ".pptx",
        }),
        "application/vnd.google-apps.spreadsheet" => Some(ExportFormat {
            export_mime:
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            extension: ".xlsx",
        }),
        _ => None,
    }
}

/// Guesses a file extension (with leading dot) from a content type.
///
/// Parameters after `;` are ignored. Returns `None` for types outside the
/// table; callers then leave the filename untouched.
#[must_use]
pub fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next().unwrap_or("").trim();

    match mime.to_lowercase().as_str() {
        "application/pdf" => Some(".pdf"),
        "application/zip" => Some(".zip"),
        "application/json" => Some(".json"),
        "application/xml" | "text/xml" => Some(".xml"),
        "application/msword" => Some(".doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            Some(".docx")
        }
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
            Some(".pptx")
        }
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some(".xlsx"),
        "text/html" => Some(".html"),
        "text/plain" => Some(".txt"),
        "text/csv" => Some(".csv"),
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/svg+xml" => Some(".svg"),
        "audio/mpeg" => Some(".mp3"),
        "video/mp4" => Some(".mp4"),
        _ => None,
    }
}

/// Maps a file extension (with leading dot, case-insensitive) back to the
/// mime type it conventionally carries.
///
/// Used to detect when a filename's existing extension already matches the
/// reported content type, so the guessed extension is not appended twice.
#[must_use]
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        ".pdf" => Some("application/pdf"),
        ".zip" => Some("application/zip"),
        ".json" => Some("application/json"),
        ".xml" => Some("application/xml"),
        ".doc" => Some("application/msword"),
        ".docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        ".pptx" => {
            Some("application/vnd.openxmlformats-officedocument.presentationml.presentation")
        }
        ".xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        ".html" | ".htm" => Some("text/html"),
        ".txt" => Some("text/plain"),
        ".csv" => Some("text/csv"),
        ".jpg" | ".jpeg" => Some("image/jpeg"),
        ".png" => Some("image/png"),
        ".gif" => Some("image/gif"),
        ".svg" => Some("image/svg+xml"),
        ".mp3" => Some("audio/mpeg"),
        ".mp4" => Some("video/mp4"),
        _ => None,
    }
}
