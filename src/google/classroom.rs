//! Google Classroom v1 client: course listing and the three material
//! collections (announcements, course-work materials, course work).

use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ApiError, check_status};
use crate::auth::Credential;

const BASE_URL: &str = "https://classroom.googleapis.com/v1";

/// Courses are listed 100 per page, following `nextPageToken` to exhaustion.
const COURSE_PAGE_SIZE: u32 = 100;

/// A course on the remote classroom service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Course {
    /// Remote course id, used for the per-course collection endpoints.
    pub id: String,
    /// Display name; selects the local subfolder and matches the blacklist.
    pub name: String,
}

/// One item of a material collection (an announcement, a posted material, or
/// an assignment). Only its attachments matter here.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CourseItem {
    /// Attached materials; absent when the item carries none.
    pub materials: Option<Vec<Material>>,
}

/// An attachment on a course item. Only drive-file attachments are handled;
/// links, forms, and videos deserialize with `drive_file: None` and are
/// skipped.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// The drive-file attachment wrapper, when present.
    pub drive_file: Option<SharedDriveFile>,
}

/// Wrapper level of the API's `material.driveFile.driveFile` nesting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedDriveFile {
    /// The referenced Drive object.
    pub drive_file: Option<DriveFileRef>,
}

/// Reference to a Drive object as embedded in Classroom materials.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileRef {
    /// Drive object id.
    pub id: Option<String>,
    /// Title at attach time (may lag the Drive-side name).
    pub title: Option<String>,
    /// Share link, used instead of `id` for `[Template]` items.
    pub alternate_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseListResponse {
    #[serde(default)]
    courses: Vec<Course>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnnouncementsResponse {
    #[serde(default)]
    announcements: Vec<CourseItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkMaterialsResponse {
    #[serde(default)]
    course_work_material: Vec<CourseItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseWorkResponse {
    #[serde(default)]
    course_work: Vec<CourseItem>,
}

/// Typed client for the Classroom API.
#[derive(Debug, Clone)]
pub struct ClassroomClient {
    http: reqwest::Client,
    base_url: String,
    bearer: String,
}

impl ClassroomClient {
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

    /// Lists all courses, following continuation tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-success status.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let endpoint = format!("{}/courses", self.base_url);
        let mut courses = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page: CourseListResponse = {
                let page_size = COURSE_PAGE_SIZE.to_string();
                let mut query = vec![("pageSize", page_size.as_str())];
                if let Some(token) = page_token.as_deref() {
                    query.push(("pageToken", token));
                }

                let response = self
                    .http
                    .get(&endpoint)
                    .query(&query)
                    .header(reqwest::header::AUTHORIZATION, &self.bearer)
                    .send()
                    .await
                    .map_err(|e| ApiError::transport(&endpoint, e))?;

                check_status(&endpoint, response)
                    .await?
                    .json()
                    .await
                    .map_err(|e| ApiError::transport(&endpoint, e))?
            };

            courses.extend(page.courses);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = courses.len(), "listed courses");
        Ok(courses)
    }

    /// Lists a course's announcements.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-success status.
    pub async fn list_announcements(&self, course_id: &str) -> Result<Vec<CourseItem>, ApiError> {
        let endpoint = format!("{}/courses/{course_id}/announcements", self.base_url);
        let response: AnnouncementsResponse = self.get_json(&endpoint).await?;
        Ok(response.announcements)
    }

    /// Lists a course's posted work materials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-success status.
    pub async fn list_work_materials(&self, course_id: &str) -> Result<Vec<CourseItem>, ApiError> {
        let endpoint = format!(
            "{}/courses/{course_id}/courseWorkMaterials",
            self.base_url
        );
        let response: WorkMaterialsResponse = self.get_json(&endpoint).await?;
        Ok(response.course_work_material)
    }

    /// Lists a course's assignments.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-success status.
    pub async fn list_course_work(&self, course_id: &str) -> Result<Vec<CourseItem>, ApiError> {
        let endpoint = format!("{}/courses/{course_id}/courseWork", self.base_url);
        let response: CourseWorkResponse = self.get_json(&endpoint).await?;
        Ok(response.course_work)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.bearer)
            .send()
            .await
            .map_err(|e| ApiError::transport(endpoint, e))?;

        check_status(endpoint, response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::transport(endpoint, e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_material_without_drive_file_deserializes() {
        let material: Material =
            serde_json::from_str(r#"{"link": {"url": "https://example.com"}}"#).unwrap();
        assert!(material.drive_file.is_none());
    }

    #[test]
    fn test_material_drive_file_nesting() {
        let json = r#"{
            "driveFile": {
                "driveFile": {
                    "id": "abc123",
                    "title": "Notes.pdf",
                    "alternateLink": "https://drive.google.com/file/d/abc123/view"
                },
                "shareMode": "VIEW"
            }
        }"#;
        let material: Material = serde_json::from_str(json).unwrap();
        let file = material.drive_file.unwrap().drive_file.unwrap();
        assert_eq!(file.id.as_deref(), Some("abc123"));
        assert_eq!(file.title.as_deref(), Some("Notes.pdf"));
    }

    #[test]
    fn test_course_item_without_materials() {
        let item: CourseItem = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert!(item.materials.is_none());
    }

    #[test]
    fn test_course_list_response_defaults_to_empty() {
        let response: CourseListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.courses.is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let credential = crate::auth::Credential {
            access_token: "at".to_string(),
            refresh_token: None,
            token_uri: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            scopes: Vec::new(),
            expires_at: 0,
        };
        let client = ClassroomClient::with_base_url(
            reqwest::Client::new(),
            &credential,
            "http://localhost:9/",
        );
        assert_eq!(client.base_url, "http://localhost:9");
    }
}
