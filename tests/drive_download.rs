//! Integration tests for the Drive client and the Downloader.

use classroom_core::auth::Credential;
use classroom_core::download::Downloader;
use classroom_core::google::DriveClient;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_credential() -> Credential {
    Credential {
        access_token: "test-token".to_string(),
        refresh_token: None,
        token_uri: String::new(),
        client_id: String::new(),
        client_secret: String::new(),
        scopes: Vec::new(),
        expires_at: u64::MAX,
    }
}

fn drive_for(server: &MockServer) -> DriveClient {
    DriveClient::with_base_url(reqwest::Client::new(), &test_credential(), &server.uri())
}

/// Mounts the metadata endpoint for a file.
async fn mount_metadata(server: &MockServer, file_id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/files/{file_id}")))
        .and(query_param("fields", "name,mimeType,exportLinks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_metadata_sends_bearer_and_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/f1"))
        .and(query_param("fields", "name,mimeType,exportLinks"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "notes.pdf",
            "mimeType": "application/pdf"
        })))
        .mount(&server)
        .await;

    let meta = drive_for(&server).get_metadata("f1").await.unwrap();
    assert_eq!(meta.name, "notes.pdf");
    assert_eq!(meta.mime_type, "application/pdf");
    assert!(meta.export_links.is_empty());
}

#[tokio::test]
async fn test_fetch_direct_media_writes_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_metadata(
        &server,
        "f1",
        serde_json::json!({"name": "notes.pdf", "mimeType": "application/pdf"}),
    )
    .await;

    let content = b"PDF content bytes";
    Mock::given(method("GET"))
        .and(path("/files/f1"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(&server)
        .await;

    let downloader = Downloader::new(drive_for(&server));
    let failure = downloader.fetch("f1", "notes.pdf", dir.path()).await;

    assert!(failure.is_none(), "download should succeed: {failure:?}");
    let written = std::fs::read(dir.path().join("notes.pdf")).unwrap();
    assert_eq!(written, content);
}

#[tokio::test]
async fn test_fetch_native_document_uses_export_endpoint() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_metadata(
        &server,
        "sheet1",
        serde_json::json!({
            "name": "Budget",
            "mimeType": "application/vnd.google-apps.spreadsheet"
        }),
    )
    .await;

    let exported = b"xlsx bytes";
    Mock::given(method("GET"))
        .and(path("/files/sheet1/export"))
        .and(query_param(
            "mimeType",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(exported.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let downloader = Downloader::new(drive_for(&server));
    let failure = downloader.fetch("sheet1", "Budget.xlsx", dir.path()).await;

    assert!(failure.is_none(), "export should succeed: {failure:?}");
    let written = std::fs::read(dir.path().join("Budget.xlsx")).unwrap();
    assert_eq!(written, exported);
}

#[tokio::test]
async fn test_fetch_export_size_limit_reports_alternate_links() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_metadata(
        &server,
        "big1",
        serde_json::json!({
            "name": "Huge Deck",
            "mimeType": "application/vnd.google-apps.presentation",
            "exportLinks": {
                "application/pdf": "https://docs.google.com/export?id=big1&format=pdf"
            }
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/files/big1/export"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {
                "errors": [{"domain": "usageLimits", "reason": "exportSizeLimitExceeded"}],
                "code": 403
            }
        })))
        .mount(&server)
        .await;

    let downloader = Downloader::new(drive_for(&server));
    let failure = downloader.fetch("big1", "Huge_Deck.pptx", dir.path()).await;

    let reason = failure.expect("oversized export must fail");
    assert!(
        reason.contains("https://docs.google.com/export?id=big1&format=pdf"),
        "failure detail should embed the alternate export link: {reason}"
    );
    assert!(reason.starts_with("Huge_Deck.pptx: ["));
    assert!(
        !dir.path().join("Huge_Deck.pptx").exists(),
        "no file may be written on failure"
    );
}

#[tokio::test]
async fn test_fetch_media_error_is_generic_failure() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_metadata(
        &server,
        "gone1",
        serde_json::json!({"name": "gone.pdf", "mimeType": "application/pdf"}),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/files/gone1"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let downloader = Downloader::new(drive_for(&server));
    let failure = downloader.fetch("gone1", "gone.pdf", dir.path()).await;
    assert_eq!(failure.as_deref(), Some("gone.pdf: [unknown]"));
}

#[tokio::test]
async fn test_fetch_metadata_error_is_generic_failure() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // No metadata mock mounted: the server answers 404.
    let downloader = Downloader::new(drive_for(&server));
    let failure = downloader.fetch("missing", "missing.bin", dir.path()).await;
    assert_eq!(failure.as_deref(), Some("missing.bin: [unknown]"));
}
