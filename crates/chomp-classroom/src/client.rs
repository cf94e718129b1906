use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use chomp_types::NewClassData;

use crate::error::{ClassroomError, Result};
use crate::types::{Course, ListCoursesResponse, ListStudentsResponse, Student};

/// OAuth scopes the access token must carry for a class import
pub const SCOPES: [&str; 4] = [
    "https://www.googleapis.com/auth/classroom.courses.readonly",
    "https://www.googleapis.com/auth/classroom.rosters.readonly",
    "https://www.googleapis.com/auth/classroom.profile.emails",
    "https://www.googleapis.com/auth/classroom.profile.photos",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassroomConfig {
    pub api_base: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for ClassroomConfig {
    fn default() -> Self {
        Self {
            api_base: "https://classroom.googleapis.com".to_string(),
            page_size: 10,
            timeout_secs: 10,
        }
    }
}

/// HTTP client for the Classroom REST API.
///
/// Callers pass the user's OAuth access token on every call; the client
/// holds no credentials of its own.
#[derive(Clone)]
pub struct ClassroomClient {
    client: Client,
    api_base: String,
    page_size: u32,
}

impl ClassroomClient {
    pub fn new(config: ClassroomConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    /// All active courses visible to the token, following pagination
    pub async fn list_active_courses(&self, access_token: &str) -> Result<Vec<Course>> {
        let url = format!("{}/v1/courses", self.api_base);
        let mut courses = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("courseStates", "ACTIVE".to_string()),
                ("pageSize", self.page_size.to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let page: ListCoursesResponse = self.get_json(&url, access_token, &query).await?;
            courses.extend(page.courses);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = courses.len(), "Fetched active Classroom courses");
        Ok(courses)
    }

    /// Every student enrolled in `course_id`, following pagination
    pub async fn list_students(&self, access_token: &str, course_id: &str) -> Result<Vec<Student>> {
        let url = format!("{}/v1/courses/{}/students", self.api_base, course_id);
        let mut students = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", self.page_size.to_string())];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let page: ListStudentsResponse = self.get_json(&url, access_token, &query).await?;
            students.extend(page.students);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(students)
    }

    /// Active courses mapped to class requests. Students without a visible
    /// email are left out of the participant list.
    pub async fn fetch_classes(&self, access_token: &str) -> Result<Vec<NewClassData>> {
        let courses = self.list_active_courses(access_token).await?;
        let mut classes = Vec::with_capacity(courses.len());

        for course in courses {
            let students = self.list_students(access_token, &course.id).await?;
            let mut participants: Vec<String> = students.iter().filter_map(Student::email).collect();
            participants.sort();
            participants.dedup();

            classes.push(NewClassData {
                name: course.name,
                section: course.section,
                description: course.description.or(course.description_heading),
                participants,
            });
        }

        tracing::info!(classes = classes.len(), "Imported classes from Classroom");
        Ok(classes)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        Ok(response.json().await?)
    }

    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%status, "Classroom rejected the access token");
            return Err(ClassroomError::Unauthorized);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        tracing::error!("Classroom API request failed: status={}, body={}", status, body);
        Err(ClassroomError::Api { status, body })
    }
}
