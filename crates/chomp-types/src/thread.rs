use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::class::ClassData;
use crate::limits::{MAX_THREAD_BODY_CHARS, MAX_THREAD_TITLE_CHARS};

/// Request body for creating a thread.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewThreadData {
    pub class_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub anonymous: bool,
}

impl NewThreadData {
    pub fn is_valid(&self) -> bool {
        let title_len = self.title.chars().count();
        let body_ok = self
            .message
            .as_ref()
            .map_or(true, |m| m.chars().count() <= MAX_THREAD_BODY_CHARS);

        !self.class_id.is_empty() && title_len > 0 && title_len <= MAX_THREAD_TITLE_CHARS && body_ok
    }
}

/// A thread document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ThreadData {
    pub id: String,
    pub class_id: String,
    pub class_name: String,
    pub email: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub anonymous: bool,
    pub is_closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<String>,
    pub num_messages: i64,
    pub score: i64,
    pub created: DateTime<Utc>,
}

impl ThreadData {
    /// A fresh, open thread with no messages and a zero score.
    pub fn new(id: String, class: &ClassData, author_email: String, request: NewThreadData) -> Self {
        Self {
            id,
            class_id: request.class_id,
            class_name: class.name.clone(),
            email: author_email,
            title: request.title,
            message: request.message,
            tags: request.tags,
            anonymous: request.anonymous,
            is_closed: false,
            answer_id: None,
            num_messages: 0,
            score: 0,
            created: Utc::now(),
        }
    }
}

/// Marks `message_id` as the accepted answer of `thread_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResolveThread {
    pub thread_id: String,
    pub message_id: String,
}
