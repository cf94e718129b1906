//! Google Classroom REST v1 client.
//!
//! Only the read-only calls needed to import a teacher's active courses and
//! their student rosters are covered.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClassroomClient, ClassroomConfig, SCOPES};
pub use error::{ClassroomError, Result};
pub use types::{Course, Student, StudentProfile};
