//! OAuth credential acquisition, refresh, and persistence.
//!
//! Two independent credentials are maintained, one per API scope set
//! (Classroom listing vs. Drive content). Each is persisted as plain JSON in
//! its own file under the run root and silently refreshed when expired; only
//! when no usable refresh token exists does the interactive installed-app
//! flow run.

mod flow;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::RunConfig;

pub use flow::ClientSecret;

/// Seconds before nominal expiry at which a token is treated as expired,
/// covering clock skew and request latency.
const EXPIRY_LEEWAY_SECS: u64 = 30;

/// The two API families, each with its own scope set and token file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeSet {
    /// Read-only Classroom listing scopes.
    Classroom,
    /// Full Drive scope for metadata, export, and content fetch.
    Drive,
}

impl ScopeSet {
    /// OAuth scopes requested for this set.
    #[must_use]
    pub fn scopes(self) -> &'static [&'static str] {
        match self {
            Self::Classroom => &[
                "https://www.googleapis.com/auth/classroom.courses.readonly",
                "https://www.googleapis.com/auth/classroom.announcements.readonly",
                "https://www.googleapis.com/auth/classroom.student-submissions.me.readonly",
                "https://www.googleapis.com/auth/classroom.courseworkmaterials.readonly",
            ],
            Self::Drive => &["https://www.googleapis.com/auth/drive"],
        }
    }

    /// File name of the persisted token under the run root.
    #[must_use]
    pub fn token_file(self) -> &'static str {
        match self {
            Self::Classroom => "token-classroom.json",
            Self::Drive => "token-drive.json",
        }
    }
}

/// Errors from credential acquisition, refresh, or persistence.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The OAuth client secret file could not be read.
    #[error("unable to read OAuth client secret file {path}: {source}")]
    ClientSecretUnreadable {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The OAuth client secret file did not parse as an installed-app secret.
    #[error("malformed OAuth client secret file {path}: {source}")]
    ClientSecretMalformed {
        /// Path that was parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Token file persistence failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Credential serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Transport failure talking to Google's OAuth endpoints.
    #[error("network error during authorization: {0}")]
    Transport(#[from] reqwest::Error),

    /// The token endpoint rejected a code exchange or refresh.
    #[error("token endpoint rejected the request (HTTP {status}): {body}")]
    TokenEndpoint {
        /// HTTP status returned by the token endpoint.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    /// The local authorization callback did not yield a usable code.
    #[error("authorization callback failed: {reason}")]
    Callback {
        /// What went wrong while waiting for the redirect.
        reason: String,
    },
}

/// A persisted OAuth credential for one scope set.
///
/// The on-disk shape mirrors Google's authorized-user files: the client id,
/// secret, and token endpoint travel with the tokens so a refresh needs no
/// other input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token presented to the APIs.
    pub access_token: String,
    /// Long-lived refresh token, when the consent flow granted one.
    pub refresh_token: Option<String>,
    /// Endpoint used for refreshes.
    pub token_uri: String,
    /// OAuth client id of the installed application.
    pub client_id: String,
    /// OAuth client secret of the installed application.
    pub client_secret: String,
    /// Scopes the credential was granted for.
    pub scopes: Vec<String>,
    /// Unix timestamp (seconds) at which the access token expires.
    pub expires_at: u64,
}

impl Credential {
    /// Whether the access token is still usable (with leeway).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        unix_now() + EXPIRY_LEEWAY_SECS < self.expires_at
    }

    /// `Authorization` header value for API requests.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Token endpoint response for both code exchange and refresh.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    refresh_token: Option<String>,
}

/// Obtains, refreshes, and persists credentials for both scope sets.
#[derive(Debug, Clone)]
pub struct CredentialManager {
    http: reqwest::Client,
    config: RunConfig,
}

impl CredentialManager {
    /// Creates a manager bound to one run's paths.
    #[must_use]
    pub fn new(http: reqwest::Client, config: RunConfig) -> Self {
        Self { http, config }
    }

    /// Produces a usable credential for `scope_set`.
    ///
    /// Order of attempts: persisted-and-valid, persisted-with-refresh-token
    /// (refreshed in place), interactive installed-app flow. Any credential
    /// that changed is written back to its scope-specific file, overwriting
    /// prior content.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the client secret file is unusable, the
    /// token endpoint rejects the request, the callback never yields a code,
    /// or the token file cannot be written.
    #[instrument(level = "debug", skip(self), fields(scope = ?scope_set))]
    pub async fn obtain(&self, scope_set: ScopeSet) -> Result<Credential, AuthError> {
        let path = self.config.token_path(scope_set.token_file());

        if let Some(mut credential) = load_credential(&path)? {
            if credential.is_valid() {
                debug!(path = %path.display(), "using persisted credential");
                return Ok(credential);
            }
            if credential.refresh_token.is_some() {
                info!(path = %path.display(), "access token expired, refreshing");
                self.refresh(&mut credential).await?;
                persist_credential(&path, &credential)?;
                return Ok(credential);
            }
            warn!(
                path = %path.display(),
                "persisted credential expired with no refresh token"
            );
        }

        let credential = flow::run_installed_flow(
            &self.http,
            self.config.credentials_path(),
            scope_set.scopes(),
        )
        .await?;
        persist_credential(&path, &credential)?;
        Ok(credential)
    }

    /// Exchanges the refresh token for a new access token, in place.
    ///
    /// Google does not return a new refresh token on refresh; the stored one
    /// is kept.
    async fn refresh(&self, credential: &mut Credential) -> Result<(), AuthError> {
        let refresh_token = credential.refresh_token.as_deref().unwrap_or_default();
        let response = self
            .http
            .post(&credential.token_uri)
            .form(&[
                ("client_id", credential.client_id.as_str()),
                ("client_secret", credential.client_secret.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        credential.access_token = token.access_token;
        credential.expires_at = unix_now() + token.expires_in;
        if let Some(refreshed) = token.refresh_token {
            credential.refresh_token = Some(refreshed);
        }
        Ok(())
    }
}

/// Loads a persisted credential, treating a missing or unparsable file as
/// absent (the caller then falls through to the interactive flow).
fn load_credential(path: &Path) -> Result<Option<Credential>, AuthError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str(&content) {
        Ok(credential) => Ok(Some(credential)),
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unparsable token file");
            Ok(None)
        }
    }
}

/// Writes the credential to its scope-specific file, replacing any previous
/// content.
fn persist_credential(path: &Path, credential: &Credential) -> Result<(), AuthError> {
    let json = serde_json::to_string_pretty(credential)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
