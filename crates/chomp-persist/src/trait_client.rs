use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chomp_types::{
    ClassData, MessageData, NewClassData, NewMessageData, NewThreadData, NewUser, ResolveThread,
    ThreadData, UserProfile, VoteList, VoteListChange, VoteTarget,
};
use chomp_votes::ScoreDelta;

use crate::error::Result;

/// Document store operations behind the forum.
///
/// Every method that touches more than one document runs inside a single
/// transaction: either all of its writes commit or none do.
#[async_trait]
pub trait ForumStore: Send + Sync {
    /// Claim an existing profile for this email or create a new one.
    ///
    /// Fails with `DuplicateProfiles` when more than one profile matches.
    async fn register_user(&self, user: NewUser) -> Result<UserProfile>;

    /// Create a class, its roster, and link every participant's profile.
    ///
    /// `participants` is the final roster (normalized, teacher first).
    async fn create_class(&self, request: NewClassData, participants: Vec<String>) -> Result<ClassData>;

    async fn get_class(&self, class_id: &str) -> Result<Option<ClassData>>;

    /// Create a thread after checking class membership and tags.
    async fn create_thread(&self, author_email: &str, request: NewThreadData) -> Result<ThreadData>;

    async fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadData>>;

    /// Create a message and bump its thread's message count.
    async fn create_message(&self, author_email: &str, request: NewMessageData) -> Result<MessageData>;

    async fn get_message(&self, message_id: &str) -> Result<Option<MessageData>>;

    /// Close a thread with an accepted answer. Only the author may do this.
    async fn resolve_thread(&self, author_email: &str, resolve: ResolveThread) -> Result<ThreadData>;

    /// Replace a voter's vote list and return the before/after snapshots.
    async fn replace_votes(
        &self,
        target: VoteTarget,
        voter: &str,
        votes: VoteList,
    ) -> Result<VoteListChange>;

    /// Add every delta to the `score` of the matching target document.
    ///
    /// Atomic across the whole slice. A missing target aborts everything
    /// with `TargetNotFound`.
    async fn apply_score_deltas(&self, target: VoteTarget, deltas: &[ScoreDelta]) -> Result<()>;

    /// Delete placeholder profiles created before `created_before`.
    async fn purge_placeholder_users(&self, created_before: DateTime<Utc>) -> Result<u64>;

    /// Lightweight connectivity check.
    async fn ping(&self) -> Result<()>;
}
