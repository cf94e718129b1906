use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A single vote value. Stored and transmitted as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VoteValue {
    Down,
    #[default]
    Neutral,
    Up,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid vote value: {0} (expected -1, 0 or 1)")]
pub struct InvalidVoteValue(pub i64);

impl VoteValue {
    pub fn as_i64(self) -> i64 {
        match self {
            VoteValue::Down => -1,
            VoteValue::Neutral => 0,
            VoteValue::Up => 1,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = InvalidVoteValue;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(VoteValue::Down),
            0 => Ok(VoteValue::Neutral),
            1 => Ok(VoteValue::Up),
            other => Err(InvalidVoteValue(other)),
        }
    }
}

impl From<VoteValue> for i64 {
    fn from(value: VoteValue) -> Self {
        value.as_i64()
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// One user's vote on one target (thread or message).
///
/// `id` is the id of the voted target, not of the voter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Vote {
    pub id: String,
    #[cfg_attr(feature = "openapi", schema(value_type = i8))]
    pub value: VoteValue,
}

impl Vote {
    pub fn new(id: impl Into<String>, value: VoteValue) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }

    pub fn up(id: impl Into<String>) -> Self {
        Self::new(id, VoteValue::Up)
    }

    pub fn down(id: impl Into<String>) -> Self {
        Self::new(id, VoteValue::Down)
    }

    pub fn neutral(id: impl Into<String>) -> Self {
        Self::new(id, VoteValue::Neutral)
    }
}

/// Snapshot of all votes one user has cast on one kind of target.
///
/// Target ids are expected to be unique. Deserialization does not enforce it,
/// since stored snapshots may predate validation; use [`VoteList::first_duplicate`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteList(Vec<Vote>);

impl VoteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Vote] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vote> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Vote> {
        self.0
    }

    /// First target id that appears more than once, if any.
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::with_capacity(self.0.len());
        self.0
            .iter()
            .find(|vote| !seen.insert(vote.id.as_str()))
            .map(|vote| vote.id.as_str())
    }

    /// Sum of all vote values in this snapshot.
    pub fn aggregate(&self) -> i64 {
        self.0.iter().map(|v| v.value.as_i64()).sum()
    }
}

impl From<Vec<Vote>> for VoteList {
    fn from(votes: Vec<Vote>) -> Self {
        Self(votes)
    }
}

impl FromIterator<Vote> for VoteList {
    fn from_iter<I: IntoIterator<Item = Vote>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VoteList {
    type Item = &'a Vote;
    type IntoIter = std::slice::Iter<'a, Vote>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Which kind of document a vote list scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum VoteTarget {
    Thread,
    Message,
}

impl VoteTarget {
    /// Collection holding per-user vote lists for this target kind.
    pub fn votes_collection(self) -> &'static str {
        match self {
            VoteTarget::Thread => "threadVotes",
            VoteTarget::Message => "messageVotes",
        }
    }

    /// Collection holding the scored documents.
    pub fn scored_collection(self) -> &'static str {
        match self {
            VoteTarget::Thread => "threads",
            VoteTarget::Message => "messages",
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteTarget::Thread => write!(f, "thread"),
            VoteTarget::Message => write!(f, "message"),
        }
    }
}

/// Before/after snapshots of one voter's vote list, as delivered by a
/// document-update event. A missing `votes` field is carried as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteListChange {
    pub target: VoteTarget,
    pub voter: String,
    pub before: Option<VoteList>,
    pub after: Option<VoteList>,
}

impl VoteListChange {
    pub fn before_votes(&self) -> &[Vote] {
        self.before.as_ref().map(VoteList::as_slice).unwrap_or(&[])
    }

    pub fn after_votes(&self) -> &[Vote] {
        self.after.as_ref().map(VoteList::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vote_value_serializes_as_integer() {
        let vote = Vote::down("t1");
        assert_eq!(serde_json::to_value(&vote).unwrap(), json!({"id": "t1", "value": -1}));
    }

    #[test]
    fn vote_value_rejects_out_of_range() {
        let result: Result<Vote, _> = serde_json::from_value(json!({"id": "t1", "value": 2}));
        assert!(result.is_err());
    }

    #[test]
    fn vote_list_is_transparent() {
        let list: VoteList = serde_json::from_value(json!([
            {"id": "a", "value": 1},
            {"id": "b", "value": 0}
        ]))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.aggregate(), 1);
    }

    #[test]
    fn first_duplicate_finds_repeated_target() {
        let list = VoteList::from(vec![Vote::up("a"), Vote::down("b"), Vote::neutral("a")]);
        assert_eq!(list.first_duplicate(), Some("a"));

        let unique = VoteList::from(vec![Vote::up("a"), Vote::down("b")]);
        assert_eq!(unique.first_duplicate(), None);
    }

    #[test]
    fn missing_snapshot_reads_as_empty() {
        let change = VoteListChange {
            target: VoteTarget::Thread,
            voter: "a@school.edu".to_string(),
            before: None,
            after: Some(VoteList::from(vec![Vote::up("t1")])),
        };
        assert!(change.before_votes().is_empty());
        assert_eq!(change.after_votes().len(), 1);
    }

    #[test]
    fn target_collections() {
        assert_eq!(VoteTarget::Thread.votes_collection(), "threadVotes");
        assert_eq!(VoteTarget::Message.scored_collection(), "messages");
    }
}
