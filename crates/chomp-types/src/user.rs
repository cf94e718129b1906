use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::class::ClassSummary;

/// A user profile document.
///
/// Profiles with an empty `uid` are placeholders: the email was added to a
/// class before its owner signed up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub classes: Vec<ClassSummary>,
    pub created: DateTime<Utc>,
}

impl UserProfile {
    pub fn placeholder(id: String, email: String, class: ClassSummary) -> Self {
        Self {
            id,
            uid: String::new(),
            name: None,
            email,
            classes: vec![class],
            created: Utc::now(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.uid.is_empty()
    }
}

/// Identity of a user who just signed up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewUser {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
}
