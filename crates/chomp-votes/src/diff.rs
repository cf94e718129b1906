//! Vote list diff: compare two snapshots of one user's votes.
//!
//! Both snapshots are indexed by target id and compared over the union of
//! their ids. A target missing from a snapshot counts as a neutral (0) vote.

use std::collections::BTreeMap;

use chomp_types::{Vote, VoteValue};

use crate::error::{VoteError, VoteResult};

/// One target whose vote value changed between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteChange {
    pub previous: Vote,
    pub current: Vote,
}

impl VoteChange {
    pub fn target_id(&self) -> &str {
        &self.current.id
    }

    /// Score adjustment implied by this change.
    pub fn delta(&self) -> i64 {
        self.current.value.as_i64() - self.previous.value.as_i64()
    }
}

/// Compute the changed votes between `previous` and `current`.
///
/// Returns exactly one [`VoteChange`] per target id whose value differs,
/// ordered by target id. Unchanged targets are omitted. A target removed
/// from `current` is reported as reverting to neutral.
pub fn find_votes_diff(previous: &[Vote], current: &[Vote]) -> VoteResult<Vec<VoteChange>> {
    let before = index_votes(previous)?;
    let after = index_votes(current)?;

    let mut changes = Vec::new();

    // Targets present before: modified or removed.
    for (&id, &old) in &before {
        let new = after.get(id).copied().unwrap_or(VoteValue::Neutral);
        if old != new {
            changes.push(change(id, old, new));
        }
    }

    // Targets only present after.
    for (&id, &new) in &after {
        if !before.contains_key(id) && new != VoteValue::Neutral {
            changes.push(change(id, VoteValue::Neutral, new));
        }
    }

    changes.sort_by(|a, b| a.target_id().cmp(b.target_id()));
    tracing::trace!(changes = changes.len(), "computed vote diff");
    Ok(changes)
}

fn index_votes(votes: &[Vote]) -> VoteResult<BTreeMap<&str, VoteValue>> {
    let mut index = BTreeMap::new();
    for vote in votes {
        if index.insert(vote.id.as_str(), vote.value).is_some() {
            return Err(VoteError::DuplicateTarget { id: vote.id.clone() });
        }
    }
    Ok(index)
}

fn change(id: &str, previous: VoteValue, current: VoteValue) -> VoteChange {
    VoteChange {
        previous: Vote::new(id, previous),
        current: Vote::new(id, current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_snapshots_no_diff() {
        let votes = vec![Vote::up("t1"), Vote::down("t2"), Vote::neutral("t3")];
        assert!(find_votes_diff(&votes, &votes).unwrap().is_empty());
    }

    #[test]
    fn flipped_vote() {
        let diff = find_votes_diff(&[Vote::up("t1")], &[Vote::down("t1")]).unwrap();
        assert_eq!(
            diff,
            vec![VoteChange {
                previous: Vote::up("t1"),
                current: Vote::down("t1"),
            }]
        );
        assert_eq!(diff[0].delta(), -2);
    }

    #[test]
    fn first_vote_starts_from_neutral() {
        let diff = find_votes_diff(&[], &[Vote::up("t1")]).unwrap();
        assert_eq!(
            diff,
            vec![VoteChange {
                previous: Vote::neutral("t1"),
                current: Vote::up("t1"),
            }]
        );
        assert_eq!(diff[0].delta(), 1);
    }

    #[test]
    fn removed_vote_reverts_to_neutral() {
        let diff = find_votes_diff(&[Vote::up("t1")], &[]).unwrap();
        assert_eq!(
            diff,
            vec![VoteChange {
                previous: Vote::up("t1"),
                current: Vote::neutral("t1"),
            }]
        );
        assert_eq!(diff[0].delta(), -1);
    }

    #[test]
    fn same_length_with_different_targets() {
        let previous = vec![Vote::up("a"), Vote::down("b")];
        let current = vec![Vote::up("a"), Vote::up("c")];

        let diff = find_votes_diff(&previous, &current).unwrap();
        let summary: Vec<(&str, i64)> = diff.iter().map(|c| (c.target_id(), c.delta())).collect();
        assert_eq!(summary, vec![("b", 1), ("c", 1)]);
    }

    #[test]
    fn shrinking_list_reports_every_removal() {
        let previous = vec![Vote::up("a"), Vote::down("b"), Vote::up("c")];
        let current = vec![Vote::up("c")];

        let diff = find_votes_diff(&previous, &current).unwrap();
        let summary: Vec<(&str, i64)> = diff.iter().map(|c| (c.target_id(), c.delta())).collect();
        assert_eq!(summary, vec![("a", -1), ("b", 1)]);
    }

    #[test]
    fn explicit_neutral_equals_absence() {
        let diff = find_votes_diff(&[], &[Vote::neutral("t1")]).unwrap();
        assert!(diff.is_empty());

        let diff = find_votes_diff(&[Vote::neutral("t1")], &[]).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn order_does_not_matter() {
        let previous = vec![Vote::up("a"), Vote::down("b")];
        let reordered = vec![Vote::down("b"), Vote::up("a")];
        assert!(find_votes_diff(&previous, &reordered).unwrap().is_empty());
    }

    #[test]
    fn duplicate_target_is_rejected() {
        let err = find_votes_diff(&[], &[Vote::up("t1"), Vote::down("t1")]).unwrap_err();
        assert_eq!(err, VoteError::DuplicateTarget { id: "t1".to_string() });

        let err = find_votes_diff(&[Vote::up("x"), Vote::up("x")], &[]).unwrap_err();
        assert_eq!(err, VoteError::DuplicateTarget { id: "x".to_string() });
    }
}
