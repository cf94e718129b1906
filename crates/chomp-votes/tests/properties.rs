use std::collections::{BTreeMap, BTreeSet};

use chomp_types::{Vote, VoteList, VoteValue};
use chomp_votes::{find_votes_diff, score_deltas, ScoreDelta};
use proptest::prelude::*;

fn vote_list() -> impl Strategy<Value = Vec<Vote>> {
    prop::collection::btree_map("[a-h]", -1i64..=1, 0..5).prop_map(|votes| {
        votes
            .into_iter()
            .map(|(id, value)| Vote::new(id, VoteValue::try_from(value).unwrap()))
            .collect()
    })
}

fn value_of(votes: &[Vote], id: &str) -> i64 {
    votes
        .iter()
        .find(|v| v.id == id)
        .map(|v| v.value.as_i64())
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn diff_with_itself_is_empty(a in vote_list()) {
        prop_assert!(find_votes_diff(&a, &a).unwrap().is_empty());
    }

    #[test]
    fn deltas_carry_aggregate_from_a_to_b(a in vote_list(), b in vote_list()) {
        let diff = find_votes_diff(&a, &b).unwrap();
        let applied: i64 = score_deltas(&diff).iter().map(|d| d.delta).sum();

        let before = VoteList::from(a).aggregate();
        let after = VoteList::from(b).aggregate();
        prop_assert_eq!(before + applied, after);
    }

    #[test]
    fn one_entry_per_changed_target(a in vote_list(), b in vote_list()) {
        let diff = find_votes_diff(&a, &b).unwrap();

        let ids: BTreeSet<&str> = a.iter().chain(b.iter()).map(|v| v.id.as_str()).collect();
        let expected: Vec<&str> = ids
            .into_iter()
            .filter(|id| value_of(&a, id) != value_of(&b, id))
            .collect();
        let actual: Vec<&str> = diff.iter().map(|c| c.target_id()).collect();
        prop_assert_eq!(actual, expected);

        for change in &diff {
            prop_assert_eq!(change.previous.value.as_i64(), value_of(&a, change.target_id()));
            prop_assert_eq!(change.current.value.as_i64(), value_of(&b, change.target_id()));
        }
    }

    #[test]
    fn per_target_scores_match_after_every_step(
        steps in prop::collection::vec(vote_list(), 1..6),
    ) {
        // One voter rewriting their list several times; scores start at zero.
        let mut scores: BTreeMap<String, i64> = BTreeMap::new();
        let mut previous: Vec<Vote> = Vec::new();

        for current in steps {
            let diff = find_votes_diff(&previous, &current).unwrap();
            for ScoreDelta { target_id, delta } in score_deltas(&diff) {
                *scores.entry(target_id).or_insert(0) += delta;
            }
            for vote in &current {
                prop_assert_eq!(scores.get(&vote.id).copied().unwrap_or(0), vote.value.as_i64());
            }
            previous = current;
        }
    }

    #[test]
    fn application_order_does_not_change_totals(
        events in prop::collection::vec((vote_list(), vote_list()), 1..5)
            .prop_flat_map(|events| {
                let len = events.len();
                (Just(events), Just((0..len).collect::<Vec<_>>()).prop_shuffle())
            }),
    ) {
        let (events, order) = events;
        let deltas: Vec<Vec<ScoreDelta>> = events
            .iter()
            .map(|(a, b)| score_deltas(&find_votes_diff(a, b).unwrap()))
            .collect();

        let mut in_order: BTreeMap<&str, i64> = BTreeMap::new();
        for batch in &deltas {
            for d in batch {
                *in_order.entry(d.target_id.as_str()).or_insert(0) += d.delta;
            }
        }

        let mut shuffled: BTreeMap<&str, i64> = BTreeMap::new();
        for i in order {
            for d in &deltas[i] {
                *shuffled.entry(d.target_id.as_str()).or_insert(0) += d.delta;
            }
        }

        prop_assert_eq!(in_order, shuffled);
    }
}
