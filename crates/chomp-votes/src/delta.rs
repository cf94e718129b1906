use std::collections::BTreeMap;

use crate::diff::VoteChange;

/// Net score adjustment for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDelta {
    pub target_id: String,
    pub delta: i64,
}

/// Collapse vote changes into one delta per target.
///
/// Deltas for the same target are summed and targets netting to zero are
/// dropped, so each target receives at most one increment. Ordered by id.
pub fn score_deltas<'a, I>(changes: I) -> Vec<ScoreDelta>
where
    I: IntoIterator<Item = &'a VoteChange>,
{
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for change in changes {
        *totals.entry(change.target_id()).or_insert(0) += change.delta();
    }

    totals
        .into_iter()
        .filter(|(_, delta)| *delta != 0)
        .map(|(id, delta)| ScoreDelta {
            target_id: id.to_string(),
            delta,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chomp_types::Vote;

    fn change(previous: Vote, current: Vote) -> VoteChange {
        VoteChange { previous, current }
    }

    #[test]
    fn coalesces_repeated_targets() {
        let changes = vec![
            change(Vote::neutral("t1"), Vote::up("t1")),
            change(Vote::neutral("t2"), Vote::down("t2")),
            change(Vote::neutral("t1"), Vote::up("t1")),
        ];

        let deltas = score_deltas(&changes);
        assert_eq!(
            deltas,
            vec![
                ScoreDelta { target_id: "t1".to_string(), delta: 2 },
                ScoreDelta { target_id: "t2".to_string(), delta: -1 },
            ]
        );
    }

    #[test]
    fn drops_targets_that_cancel_out() {
        let changes = vec![
            change(Vote::neutral("t1"), Vote::up("t1")),
            change(Vote::up("t1"), Vote::neutral("t1")),
        ];
        assert!(score_deltas(&changes).is_empty());
    }

    #[test]
    fn empty_changes_produce_no_deltas() {
        assert!(score_deltas(&Vec::<VoteChange>::new()).is_empty());
    }
}
