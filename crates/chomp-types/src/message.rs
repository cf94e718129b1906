use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::limits::MAX_MESSAGE_CHARS;

/// Request body for posting a message in a thread.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewMessageData {
    pub class_id: String,
    pub thread_id: String,
    pub parent_id: String,
    pub message: String,
}

impl NewMessageData {
    pub fn is_valid(&self) -> bool {
        !self.class_id.is_empty()
            && !self.thread_id.is_empty()
            && !self.parent_id.is_empty()
            && self.message.chars().count() <= MAX_MESSAGE_CHARS
    }
}

/// A message document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageData {
    pub id: String,
    pub thread_id: String,
    pub class_id: String,
    pub parent_id: String,
    pub score: i64,
    pub message: String,
    pub email: String,
    pub sent: DateTime<Utc>,
}

impl MessageData {
    pub fn new(id: String, author_email: String, request: NewMessageData) -> Self {
        Self {
            id,
            thread_id: request.thread_id,
            class_id: request.class_id,
            parent_id: request.parent_id,
            score: 0,
            message: request.message,
            email: author_email,
            sent: Utc::now(),
        }
    }
}
