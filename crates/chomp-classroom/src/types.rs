use serde::Deserialize;

/// A Classroom course, trimmed to the fields Chomp uses
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_heading: Option<String>,
    #[serde(default)]
    pub course_state: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default)]
    pub course_id: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub profile: Option<StudentProfile>,
}

impl Student {
    /// Lowercased email, if the token had the profile.emails scope
    pub fn email(&self) -> Option<String> {
        self.profile
            .as_ref()
            .and_then(|p| p.email_address.as_deref())
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_lowercase)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub name: Option<Name>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListCoursesResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListStudentsResponse {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
