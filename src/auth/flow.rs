//! Interactive installed-app authorization flow.
//!
//! Binds a localhost listener on an ephemeral port, prints the consent URL
//! for the operator to open, waits for the single redirect request carrying
//! the authorization code, and exchanges the code for tokens.

use std::path::Path;

use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, info};
use url::Url;

use super::{AuthError, Credential, TokenResponse, unix_now};

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Page shown in the operator's browser once the code has been captured.
const CALLBACK_PAGE: &str =
    "<html><body>Authorization received. You may close this window.</body></html>";

/// Installed-application OAuth client secret (`credentials.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Authorization endpoint; Google's default when the file omits it.
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Token endpoint; Google's default when the file omits it.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Wrapper matching the on-disk `{"installed": {...}}` shape.
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: ClientSecret,
}

impl ClientSecret {
    /// Loads an installed-app client secret from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ClientSecretUnreadable`] when the file cannot be
    /// read and [`AuthError::ClientSecretMalformed`] when it does not parse.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| AuthError::ClientSecretUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        let file: ClientSecretFile =
            serde_json::from_str(&content).map_err(|source| AuthError::ClientSecretMalformed {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(file.installed)
    }
}

/// Runs the full interactive flow and returns a fresh credential.
///
/// # Errors
///
/// Returns [`AuthError`] when the client secret is unusable, the callback
/// listener fails or receives a denial, or the code exchange is rejected.
pub(super) async fn run_installed_flow(
    http: &reqwest::Client,
    secret_path: &Path,
    scopes: &[&str],
) -> Result<Credential, AuthError> {
    let secret = ClientSecret::load(secret_path)?;

    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let port = listener.local_addr()?.port();
    let redirect_uri = format!("http://127.0.0.1:{port}/");

    let consent_url = build_consent_url(&secret, &redirect_uri, scopes)?;
    println!("Open this URL in your browser to authorize:");
    println!("{consent_url}");

    info!(port, "waiting for authorization redirect");
    let code = wait_for_code(&listener).await?;
    debug!("authorization code received, exchanging for tokens");

    exchange_code(http, &secret, &redirect_uri, &code, scopes).await
}

/// Builds the consent-screen URL for the operator to open.
fn build_consent_url(
    secret: &ClientSecret,
    redirect_uri: &str,
    scopes: &[&str],
) -> Result<Url, AuthError> {
    let scope = scopes.join(" ");
    Url::parse_with_params(
        &secret.auth_uri,
        &[
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|error| AuthError::Callback {
        reason: format!("invalid authorization endpoint: {error}"),
    })
}

/// Accepts the single redirect request and extracts the `code` parameter.
async fn wait_for_code(listener: &TcpListener) -> Result<String, AuthError> {
    let (mut stream, _addr) = listener.accept().await?;

    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    // Only the request line matters; read until the header block ends.
    loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if buffer.windows(4).any(|w| w == b"\r\n\r\n") || buffer.len() > 16 * 1024 {
            break;
        }
    }

    let request = String::from_utf8_lossy(&buffer);
    let result = code_from_request(&request);

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        CALLBACK_PAGE.len(),
        CALLBACK_PAGE
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;

    result
}

/// Pulls the authorization code out of the redirect request.
fn code_from_request(request: &str) -> Result<String, AuthError> {
    let request_line = request.lines().next().unwrap_or_default();
    let path = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| AuthError::Callback {
            reason: format!("malformed redirect request line: {request_line:?}"),
        })?;

    let url = Url::parse(&format!("http://localhost{path}")).map_err(|error| {
        AuthError::Callback {
            reason: format!("unparsable redirect path {path:?}: {error}"),
        }
    })?;

    if let Some((_, error)) = url.query_pairs().find(|(key, _)| key == "error") {
        return Err(AuthError::Callback {
            reason: format!("authorization denied: {error}"),
        });
    }

    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, code)| code.into_owned())
        .ok_or_else(|| AuthError::Callback {
            reason: "redirect carried no authorization code".to_string(),
        })
}

/// Exchanges the authorization code for tokens and assembles the credential.
async fn exchange_code(
    http: &reqwest::Client,
    secret: &ClientSecret,
    redirect_uri: &str,
    code: &str,
    scopes: &[&str],
) -> Result<Credential, AuthError> {
    let response = http
        .post(&secret.token_uri)
        .form(&[
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
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
    Ok(Credential {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        token_uri: secret.token_uri.clone(),
        client_id: secret.client_id.clone(),
        client_secret: secret.client_secret.clone(),
        scopes: scopes.iter().map(ToString::to_string).collect(),
        expires_at: unix_now() + token.expires_in,
    })
}
