//! Vote reconciliation for the Chomp forum.
//!
//! Turns two snapshots of a user's vote list into the score increments that
//! bring every affected thread or message up to date.
//!
//! # Key Types
//!
//! - [`VoteChange`] -- one target whose vote value changed
//! - [`ScoreDelta`] -- net increment for one target

pub mod delta;
pub mod diff;
pub mod error;

pub use delta::{score_deltas, ScoreDelta};
pub use diff::{find_votes_diff, VoteChange};
pub use error::{VoteError, VoteResult};
