use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use chomp_classroom::ClassroomError;
use chomp_persist::PersistError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Either the identity token is missing or invalid, or you are not allowed to do this. Try logging in again and repeat the request.")]
    Unauthenticated,

    #[error("Class could not be made due to a bad request. A class request requires a class name and at most 40 participants.")]
    ClassRequest,

    #[error("Thread could not be made due to a bad request. A thread request requires a title under 300 characters, an optional message under 1500 characters, a valid class id, and valid tags.")]
    ThreadRequest,

    #[error("Message could not be sent due to a bad request. A message requires class, thread and parent ids and at most 2000 characters.")]
    MessageRequest,

    #[error("Votes could not be saved: {0}")]
    VoteRequest(String),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("The requested resource does not exist or returned no data.")]
    EmptyResponse,

    #[error("Persistence error: {0}")]
    Persist(PersistError),

    #[error("Classroom error: {0}")]
    Classroom(ClassroomError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned by every endpoint
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub code: u16,
    pub status: String,
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::ClassRequest
            | ApiError::ThreadRequest
            | ApiError::MessageRequest
            | ApiError::VoteRequest(_)
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::EmptyResponse => StatusCode::NOT_FOUND,
            ApiError::Persist(_)
            | ApiError::Classroom(_)
            | ApiError::Config(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Domain failures become client errors; storage failures stay internal.
impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::ClassNotFound(_)
            | PersistError::ThreadNotFound(_)
            | PersistError::MessageNotFound(_)
            | PersistError::TargetNotFound { .. } => ApiError::EmptyResponse,
            PersistError::NotParticipant { .. }
            | PersistError::NotThreadAuthor { .. }
            | PersistError::DuplicateProfiles(_) => ApiError::Unauthenticated,
            PersistError::InvalidTags(_) => ApiError::ThreadRequest,
            other => ApiError::Persist(other),
        }
    }
}

impl From<ClassroomError> for ApiError {
    fn from(err: ClassroomError) -> Self {
        match err {
            ClassroomError::Unauthorized => ApiError::Unauthenticated,
            other => ApiError::Classroom(other),
        }
    }
}

/// Malformed or mistyped JSON bodies still answer with the standard error body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                "Storage error".to_string()
            }
            ApiError::Classroom(ref e) => {
                tracing::error!("Classroom error: {}", e);
                "Classroom request failed".to_string()
            }
            ApiError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
            ApiError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorBody {
            code: status.as_u16(),
            status: status_label(status).to_string(),
            message,
        });

        (status, body).into_response()
    }
}

fn status_label(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED => "UNAUTHENTICATED",
        StatusCode::BAD_REQUEST => "BAD REQUEST",
        StatusCode::NOT_FOUND => "NOT FOUND",
        _ => "INTERNAL",
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
