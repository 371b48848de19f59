//! Google Drive v3 client: file metadata, export, and raw content fetch.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, check_status};
use crate::auth::Credential;

const BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Metadata fields requested for every lookup; `exportLinks` feeds the
/// oversized-export failure detail.
const METADATA_FIELDS: &str = "name,mimeType,exportLinks";

/// Drive file metadata relevant to naming and download routing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileMeta {
    /// Current Drive-side name.
    pub name: String,
    /// Mime type; decides export-vs-direct fetch.
    #[serde(default)]
    pub mime_type: String,
    /// Alternate export links for native documents, keyed by mime type.
    #[serde(default)]
    pub export_links: HashMap<String, String>,
}

/// Typed client for the Drive API.
#[derive(Debug, Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    base_url: String,
    bearer: String,
}

impl DriveClient {
    /// Creates a client against the production endpoint.
    #[must_use]
    pub fn new(http: reqwest::Client, credential: &Credential) -> Self {
        Self::with_base_url(http, credential, BASE_URL)
    }

    /// Creates a client against an explicit base URL (mock servers in tests).
    #[must_use]
    pub fn with_base_url(
        http: reqwest::Client,
        credential: &Credential,
        base_url: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: credential.bearer(),
        }
    }

    /// Fetches name, mime type, and export links for a file.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-success status.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_metadata(&self, file_id: &str) -> Result<DriveFileMeta, ApiError> {
        let endpoint = format!("{}/files/{file_id}", self.base_url);
        let response = self
            .http
            .get(&endpoint)
            .query(&[("fields", METADATA_FIELDS)])
            .header(reqwest::header::AUTHORIZATION, &self.bearer)
            .send()
            .await
            .map_err(|e| ApiError::transport(&endpoint, e))?;

        check_status(&endpoint, response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::transport(&endpoint, e))
    }

    /// Starts an export of a native document to `export_mime`.
    ///
    /// The returned response is checked for status; the caller streams the
    /// body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-success status
    /// (including the export size limit, surfaced as HTTP 403 with reason
    /// `exportSizeLimitExceeded`).
    pub async fn export(
        &self,
        file_id: &str,
        export_mime: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let endpoint = format!("{}/files/{file_id}/export", self.base_url);
        let response = self
            .http
            .get(&endpoint)
            .query(&[("mimeType", export_mime)])
            .header(reqwest::header::AUTHORIZATION, &self.bearer)
            .send()
            .await
            .map_err(|e| ApiError::transport(&endpoint, e))?;

        check_status(&endpoint, response).await
    }

    /// Starts a raw content fetch (`alt=media`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-success status.
    pub async fn get_media(&self, file_id: &str) -> Result<reqwest::Response, ApiError> {
        let endpoint = format!("{}/files/{file_id}", self.base_url);
        let response = self
            .http
            .get(&endpoint)
            .query(&[("alt", "media")])
            .header(reqwest::header::AUTHORIZATION, &self.bearer)
            .send()
            .await
            .map_err(|e| ApiError::transport(&endpoint, e))?;

        check_status(&endpoint, response).await
    }
}
