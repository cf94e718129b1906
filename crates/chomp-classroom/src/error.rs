use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassroomError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Access token rejected by Classroom")]
    Unauthorized,

    #[error("Classroom API error: status={status}, body={body}")]
    Api { status: StatusCode, body: String },
}

pub type Result<T> = std::result::Result<T, ClassroomError>;
