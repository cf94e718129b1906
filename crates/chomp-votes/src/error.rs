//! Error types for vote diffing.

/// Errors raised while comparing vote list snapshots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    /// A snapshot voted on the same target more than once.
    #[error("duplicate vote target in snapshot: {id}")]
    DuplicateTarget { id: String },
}

pub type VoteResult<T> = Result<T, VoteError>;
