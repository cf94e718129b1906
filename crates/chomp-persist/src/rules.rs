//! Membership and ownership checks shared by every store backend.
//!
//! Backends load the documents inside their transaction and hand them here,
//! so the rules stay identical whichever store is in use.

use chomp_types::{ClassData, MessageData, NewMessageData, NewThreadData, ThreadData};

use crate::error::{PersistError, Result};

/// Class must exist, the author must be a participant and every tag must be
/// defined on the class.
pub fn check_new_thread(
    class: Option<ClassData>,
    author_email: &str,
    request: &NewThreadData,
) -> Result<ClassData> {
    let class = class.ok_or_else(|| PersistError::ClassNotFound(request.class_id.clone()))?;
    ensure_participant(&class, author_email)?;
    if !class.accepts_tags(&request.tags) {
        return Err(PersistError::InvalidTags(class.id));
    }
    Ok(class)
}

/// Class must exist with the author in it, and the thread must belong to it.
pub fn check_new_message(
    class: Option<ClassData>,
    thread: Option<ThreadData>,
    author_email: &str,
    request: &NewMessageData,
) -> Result<ThreadData> {
    let class = class.ok_or_else(|| PersistError::ClassNotFound(request.class_id.clone()))?;
    ensure_participant(&class, author_email)?;

    match thread {
        Some(thread) if thread.class_id == class.id => Ok(thread),
        _ => Err(PersistError::ThreadNotFound(request.thread_id.clone())),
    }
}

/// Only the thread author may pick an answer, and it must be a reply in that thread.
pub fn check_resolution(
    thread: Option<ThreadData>,
    message: Option<MessageData>,
    author_email: &str,
    thread_id: &str,
    message_id: &str,
) -> Result<ThreadData> {
    let thread = thread.ok_or_else(|| PersistError::ThreadNotFound(thread_id.to_string()))?;
    if !thread.email.eq_ignore_ascii_case(author_email) {
        return Err(PersistError::NotThreadAuthor {
            email: author_email.to_string(),
            thread_id: thread.id,
        });
    }

    match message {
        Some(message) if message.thread_id == thread.id => Ok(thread),
        _ => Err(PersistError::MessageNotFound(message_id.to_string())),
    }
}

fn ensure_participant(class: &ClassData, email: &str) -> Result<()> {
    if class.has_participant(email) {
        Ok(())
    } else {
        Err(PersistError::NotParticipant {
            email: email.to_string(),
            class_id: class.id.clone(),
        })
    }
}
