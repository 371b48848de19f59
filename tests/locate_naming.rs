//! Integration tests for display-name resolution against a mock Drive API.

use classroom_core::auth::Credential;
use classroom_core::google::DriveClient;
use classroom_core::locate::resolve_file_name;
use wiremock::matchers::{method, path, query_param};
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

async fn mount_metadata(server: &MockServer, file_id: &str, name: &str, mime: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/files/{file_id}")))
        .and(query_param("fields", "name,mimeType,exportLinks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": name,
            "mimeType": mime
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_matching_extension_is_not_duplicated() {
    let server = MockServer::start().await;
    mount_metadata(&server, "f1", "report.pdf", "application/pdf").await;

    let name = resolve_file_name(&drive_for(&server), "f1").await;
    assert_eq!(name.as_deref(), Some("report.pdf"));
}

#[tokio::test]
async fn test_guessed_extension_appended_when_missing() {
    let server = MockServer::start().await;
    mount_metadata(&server, "f1", "holiday photo", "image/png").await;

    let name = resolve_file_name(&drive_for(&server), "f1").await;
    assert_eq!(name.as_deref(), Some("holiday_photo.png"));
}

#[tokio::test]
async fn test_mismatched_extension_gets_appended_type() {
    let server = MockServer::start().await;
    mount_metadata(&server, "f1", "notes.txt", "application/pdf").await;

    let name = resolve_file_name(&drive_for(&server), "f1").await;
    assert_eq!(name.as_deref(), Some("notes.txt.pdf"));
}

#[tokio::test]
async fn test_native_document_extension_replaced_by_export_format() {
    let server = MockServer::start().await;
    mount_metadata(
        &server,
        "f1",
        "Budget 2023",
        "application/vnd.google-apps.spreadsheet",
    )
    .await;

    let name = resolve_file_name(&drive_for(&server), "f1").await;
    assert_eq!(name.as_deref(), Some("Budget_2023.xlsx"));
}

#[tokio::test]
async fn test_unknown_mime_leaves_name_untouched() {
    let server = MockServer::start().await;
    mount_metadata(&server, "f1", "blob", "application/x-proprietary").await;

    let name = resolve_file_name(&drive_for(&server), "f1").await;
    assert_eq!(name.as_deref(), Some("blob"));
}

#[tokio::test]
async fn test_lookup_failure_falls_back_to_none() {
    let server = MockServer::start().await;
    // No metadata mock: the server answers 404.
    let name = resolve_file_name(&drive_for(&server), "missing").await;
    assert!(name.is_none(), "caller falls back to the attachment title");
}

#[tokio::test]
async fn test_empty_mime_type_keeps_sanitized_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/f1"))
        .and(query_param("fields", "name,mimeType,exportLinks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"name": "just a name"})),
        )
        .mount(&server)
        .await;

    let name = resolve_file_name(&drive_for(&server), "f1").await;
    assert_eq!(name.as_deref(), Some("just_a_name"));
}
