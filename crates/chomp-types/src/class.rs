use serde::{Deserialize, Serialize};

use crate::limits::MAX_CLASS_PARTICIPANTS;
use crate::normalize_email;

/// Request body for creating a class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewClassData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl NewClassData {
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.participants.len() <= MAX_CLASS_PARTICIPANTS
    }

    /// Lowercased, de-duplicated participant list with the teacher first.
    pub fn roster_with_teacher(&self, teacher_email: &str) -> Vec<String> {
        let mut roster = vec![normalize_email(teacher_email)];
        for email in &self.participants {
            let email = normalize_email(email);
            if !email.is_empty() && !roster.contains(&email) {
                roster.push(email);
            }
        }
        roster
    }
}

/// A class document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClassData {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    pub roster: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ClassData {
    /// Builds the class document for a new class. The roster shares the class id.
    pub fn from_request(id: String, request: &NewClassData, participants: Vec<String>) -> Self {
        Self {
            roster: id.clone(),
            id,
            name: request.name.clone(),
            section: request.section.clone(),
            description: request.description.clone(),
            participants,
            tags: Vec::new(),
        }
    }

    pub fn has_participant(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.participants.iter().any(|p| *p == email)
    }

    /// Every requested tag must already be defined on the class.
    pub fn accepts_tags(&self, tags: &[String]) -> bool {
        tags.iter().all(|tag| self.tags.contains(tag))
    }

    pub fn summary(&self) -> ClassSummary {
        ClassSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            section: self.section.clone(),
            description: self.description.clone(),
        }
    }
}

/// Class info copied onto each participant's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClassSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Roster document; its id is the class id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub id: String,
    pub class_id: String,
    pub participants: Vec<String>,
}
