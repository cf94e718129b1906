//! Document and vote types shared by every Chomp crate.

pub mod class;
pub mod message;
pub mod thread;
pub mod user;
pub mod vote;

pub use class::{ClassData, ClassSummary, NewClassData, Roster};
pub use message::{MessageData, NewMessageData};
pub use thread::{NewThreadData, ResolveThread, ThreadData};
pub use user::{NewUser, UserProfile};
pub use vote::{InvalidVoteValue, Vote, VoteList, VoteListChange, VoteTarget, VoteValue};

pub mod limits {
    pub const MAX_CLASS_PARTICIPANTS: usize = 40;
    pub const MAX_THREAD_TITLE_CHARS: usize = 300;
    pub const MAX_THREAD_BODY_CHARS: usize = 1500;
    pub const MAX_MESSAGE_CHARS: usize = 2000;
}

/// Emails are compared case-insensitively and stored lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Fresh document id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
