use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[cfg(feature = "mongodb")]
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[cfg(feature = "mongodb")]
    #[error("BSON serialization error: {0}")]
    BsonSerialization(#[from] bson::ser::Error),

    #[cfg(feature = "mongodb")]
    #[error("BSON deserialization error: {0}")]
    BsonDeserialization(#[from] bson::de::Error),

    #[error("No {collection} document with id {id}")]
    TargetNotFound { collection: &'static str, id: String },

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("{email} is not a participant of class {class_id}")]
    NotParticipant { email: String, class_id: String },

    #[error("{email} did not author thread {thread_id}")]
    NotThreadAuthor { email: String, thread_id: String },

    #[error("Tags are not defined on class {0}")]
    InvalidTags(String),

    #[error("More than one profile exists for {0}")]
    DuplicateProfiles(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, PersistError>;
