//! REST clients for the Google Classroom and Google Drive APIs.
//!
//! Both clients are thin typed wrappers over a shared `reqwest::Client`,
//! authenticated with a bearer token obtained by the credential manager.
//! Base URLs are injectable so tests can point them at a mock server.

mod classroom;
mod drive;

pub use classroom::{ClassroomClient, Course, CourseItem, DriveFileRef, Material, SharedDriveFile};
pub use drive::{DriveClient, DriveFileMeta};

/// Errors from either API family.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connection, TLS, body decode).
    #[error("network error calling {endpoint}: {source}")]
    Transport {
        /// The endpoint that failed.
        endpoint: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("HTTP {status} from {endpoint}")]
    Status {
        /// The endpoint that answered.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, kept for reason extraction and diagnosis.
        body: String,
    },
}

impl ApiError {
    /// Creates a transport error with endpoint context.
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// The machine-readable reason of a Google error response, if any.
    ///
    /// Google error bodies look like
    /// `{"error": {"errors": [{"reason": "exportSizeLimitExceeded", ...}]}}`.
    #[must_use]
    pub fn google_reason(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("error")?
            .get("errors")?
            .get(0)?
            .get("reason")?
            .as_str()
            .map(ToString::to_string)
    }
}

/// Consumes a response, turning non-success statuses into [`ApiError::Status`]
/// with the body preserved.
pub(crate) async fn check_status(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}
