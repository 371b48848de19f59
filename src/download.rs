//! Chunked download of one Drive object to local disk.
//!
//! Native documents are exported to their interchange format; everything
//! else is fetched directly. The body streams chunk-by-chunk into an
//! in-memory buffer with a progress bar, then lands in the course folder in
//! one write. Failures never propagate past [`Downloader::fetch`]; they come
//! back as a reason string for the Failed report.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::google::{ApiError, DriveClient, DriveFileMeta};
use crate::mime::{ExportFormat, resolve_export};

/// Reason Google attaches to a 403 when a native document is too large for
/// the requested export format.
const EXPORT_SIZE_REASON: &str = "exportSizeLimitExceeded";

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads Drive objects into course folders.
#[derive(Debug, Clone)]
pub struct Downloader {
    drive: DriveClient,
}

impl Downloader {
    /// Creates a downloader over a Drive client.
    #[must_use]
    pub fn new(drive: DriveClient) -> Self {
        Self { drive }
    }

    /// Fetches one object into `<course_dir>/<file_name>`.
    ///
    /// Returns `None` on success and `Some(reason)` on failure — the reason
    /// is the Failed-report entry. When an export hit the size limit, the
    /// reason embeds every alternate export link from the object's metadata
    /// so the operator can follow up manually; those links are not retried
    /// here. The course directory must already exist; no directories are
    /// created at this stage.
    pub async fn fetch(
        &self,
        file_id: &str,
        file_name: &str,
        course_dir: &Path,
    ) -> Option<String> {
        let meta = match self.drive.get_metadata(file_id).await {
            Ok(meta) => meta,
            Err(error) => {
                warn!(file_id, %error, "metadata fetch failed");
                return Some(format!("{file_name}: [unknown]"));
            }
        };

        let export = resolve_export(&meta.mime_type);
        match self.transfer(file_id, file_name, course_dir, &meta, export).await {
            Ok(()) => None,
            Err(error) if export.is_some() && is_export_size_exceeded(&error) => {
                warn!(file_name, "download failed, please check FAILED_DOWNLOADS.txt");
                Some(export_links_detail(file_name, &meta.export_links))
            }
            Err(error) => {
                warn!(file_name, %error, "download failed");
                Some(format!("{file_name}: [unknown]"))
            }
        }
    }

    async fn transfer(
        &self,
        file_id: &str,
        file_name: &str,
        course_dir: &Path,
        meta: &DriveFileMeta,
        export: Option<ExportFormat>,
    ) -> Result<(), FetchError> {
        let (response, mime_label) = match export {
            Some(format) => (
                self.drive.export(file_id, format.export_mime).await?,
                format.export_mime,
            ),
            None => (self.drive.get_media(file_id).await?, meta.mime_type.as_str()),
        };

        let buffer = read_chunked(response, mime_label).await?;
        debug!(file_name, bytes = buffer.len(), "transfer complete");

        let path = course_dir.join(file_name);
        tokio::fs::write(&path, &buffer)
            .await
            .map_err(|source| FetchError::Io { path, source })?;
        Ok(())
    }
}

/// Streams the response body into memory, ticking the progress bar per
/// received chunk. No per-chunk retry; the transport's own behavior applies.
async fn read_chunked(response: reqwest::Response, mime: &str) -> Result<Vec<u8>, FetchError> {
    let endpoint = response.url().to_string();
    let total = response.content_length();
    let bar = progress_bar(total, mime);

    let mut buffer = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::Api(ApiError::transport(&endpoint, e)))?;
        buffer.extend_from_slice(&chunk);
        bar.inc(chunk.len() as u64);
    }
    bar.finish_and_clear();
    Ok(buffer)
}

/// Percent bar when the transfer length is known, byte spinner otherwise.
fn progress_bar(total: Option<u64>, mime: &str) -> ProgressBar {
    let bar = match total {
        Some(length) => {
            let bar = ProgressBar::new(length);
            bar.set_style(
                ProgressStyle::with_template("Download [{bar:30}] {percent}% - [{msg}]")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("Download {spinner} {bytes} - [{msg}]")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    };
    bar.set_message(mime.to_string());
    bar
}

fn is_export_size_exceeded(error: &FetchError) -> bool {
    match error {
        FetchError::Api(api) => api.google_reason().as_deref() == Some(EXPORT_SIZE_REASON),
        FetchError::Io { .. } => false,
    }
}

/// Failed-report entry embedding every alternate export link, sorted for
/// stable output.
fn export_links_detail(file_name: &str, export_links: &HashMap<String, String>) -> String {
    let mut links: Vec<&str> = export_links.values().map(String::as_str).collect();
    links.sort_unstable();
    format!("{file_name}: [{}]", links.join(", "))
}
