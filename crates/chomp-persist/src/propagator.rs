use std::sync::Arc;

use chomp_types::VoteListChange;
use chomp_votes::{find_votes_diff, score_deltas, ScoreDelta, VoteError};

use crate::error::Result;
use crate::trait_client::ForumStore;

/// What happened to one vote-list change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// No target changed value.
    Unchanged,
    /// Deltas were committed in one transaction.
    Applied(Vec<ScoreDelta>),
    /// A snapshot was malformed and the change was skipped.
    Rejected(VoteError),
}

/// Turns vote-list changes into score increments on threads or messages.
#[derive(Clone)]
pub struct ScorePropagator {
    store: Arc<dyn ForumStore>,
}

impl ScorePropagator {
    pub fn new(store: Arc<dyn ForumStore>) -> Self {
        Self { store }
    }

    /// Diff the snapshots, coalesce per target and apply atomically.
    ///
    /// A missing target aborts the whole batch and is returned as an error;
    /// nothing is retried here.
    pub async fn propagate(&self, change: &VoteListChange) -> Result<PropagationOutcome> {
        let changes = match find_votes_diff(change.before_votes(), change.after_votes()) {
            Ok(changes) => changes,
            Err(err) => {
                tracing::warn!(
                    target_kind = %change.target,
                    voter = %change.voter,
                    error = %err,
                    "Skipping malformed vote list"
                );
                return Ok(PropagationOutcome::Rejected(err));
            }
        };

        let deltas = score_deltas(&changes);
        if deltas.is_empty() {
            tracing::debug!(voter = %change.voter, "Vote list changed without score effect");
            return Ok(PropagationOutcome::Unchanged);
        }

        if let Err(err) = self.store.apply_score_deltas(change.target, &deltas).await {
            tracing::error!(
                target_kind = %change.target,
                voter = %change.voter,
                targets = deltas.len(),
                error = %err,
                "Update {} votes failed",
                change.target
            );
            return Err(err);
        }

        tracing::info!(
            target_kind = %change.target,
            voter = %change.voter,
            targets = deltas.len(),
            "Applied vote score deltas"
        );
        Ok(PropagationOutcome::Applied(deltas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistError;
    use crate::memory::InMemoryForumStore;
    use chomp_types::{
        ClassData, MessageData, NewClassData, ThreadData, Vote, VoteList, VoteTarget,
    };

    fn seeded_store() -> Arc<InMemoryForumStore> {
        let store = Arc::new(InMemoryForumStore::new());
        let class = ClassData::from_request(
            "c1".to_string(),
            &NewClassData {
                name: "Physics".to_string(),
                ..Default::default()
            },
            vec!["t@school.edu".to_string()],
        );
        for id in ["t1", "t2"] {
            let thread = ThreadData::new(
                id.to_string(),
                &class,
                "t@school.edu".to_string(),
                chomp_types::NewThreadData {
                    class_id: "c1".to_string(),
                    title: format!("thread {id}"),
                    ..Default::default()
                },
            );
            store.insert_thread(thread).unwrap();
        }
        store
            .insert_message(MessageData::new(
                "m1".to_string(),
                "t@school.edu".to_string(),
                chomp_types::NewMessageData {
                    class_id: "c1".to_string(),
                    thread_id: "t1".to_string(),
                    parent_id: "t1".to_string(),
                    message: "hello".to_string(),
                },
            ))
            .unwrap();
        store.insert_class(class).unwrap();
        store
    }

    fn change(target: VoteTarget, before: Option<Vec<Vote>>, after: Option<Vec<Vote>>) -> VoteListChange {
        VoteListChange {
            target,
            voter: "ann@school.edu".to_string(),
            before: before.map(VoteList::from),
            after: after.map(VoteList::from),
        }
    }

    #[tokio::test]
    async fn flip_applies_minus_two() {
        let store = seeded_store();
        let propagator = ScorePropagator::new(store.clone());

        propagator
            .propagate(&change(VoteTarget::Thread, None, Some(vec![Vote::up("t1")])))
            .await
            .unwrap();
        let outcome = propagator
            .propagate(&change(
                VoteTarget::Thread,
                Some(vec![Vote::up("t1")]),
                Some(vec![Vote::down("t1")]),
            ))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PropagationOutcome::Applied(vec![ScoreDelta { target_id: "t1".to_string(), delta: -2 }])
        );
        assert_eq!(store.score(VoteTarget::Thread, "t1").unwrap(), Some(-1));
    }

    #[tokio::test]
    async fn removed_vote_is_reverted() {
        let store = seeded_store();
        let propagator = ScorePropagator::new(store.clone());

        propagator
            .propagate(&change(VoteTarget::Thread, Some(vec![]), Some(vec![Vote::up("t1"), Vote::up("t2")])))
            .await
            .unwrap();
        propagator
            .propagate(&change(
                VoteTarget::Thread,
                Some(vec![Vote::up("t1"), Vote::up("t2")]),
                Some(vec![Vote::up("t2")]),
            ))
            .await
            .unwrap();

        assert_eq!(store.score(VoteTarget::Thread, "t1").unwrap(), Some(0));
        assert_eq!(store.score(VoteTarget::Thread, "t2").unwrap(), Some(1));
    }

    #[tokio::test]
    async fn absent_votes_field_is_empty_list() {
        let store = seeded_store();
        let propagator = ScorePropagator::new(store.clone());

        let outcome = propagator
            .propagate(&change(VoteTarget::Message, None, None))
            .await
            .unwrap();
        assert_eq!(outcome, PropagationOutcome::Unchanged);
    }

    #[tokio::test]
    async fn duplicate_targets_are_skipped() {
        let store = seeded_store();
        let propagator = ScorePropagator::new(store.clone());

        let outcome = propagator
            .propagate(&change(
                VoteTarget::Thread,
                None,
                Some(vec![Vote::up("t1"), Vote::up("t1")]),
            ))
            .await
            .unwrap();

        assert!(matches!(outcome, PropagationOutcome::Rejected(VoteError::DuplicateTarget { .. })));
        assert_eq!(store.score(VoteTarget::Thread, "t1").unwrap(), Some(0));
    }

    #[tokio::test]
    async fn missing_target_aborts_batch() {
        let store = seeded_store();
        let propagator = ScorePropagator::new(store.clone());

        let err = propagator
            .propagate(&change(
                VoteTarget::Message,
                None,
                Some(vec![Vote::up("m1"), Vote::down("gone")]),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, PersistError::TargetNotFound { collection: "messages", .. }));
        assert_eq!(store.score(VoteTarget::Message, "m1").unwrap(), Some(0));
    }

    #[tokio::test]
    async fn concurrent_voters_sum_up() {
        let store = seeded_store();
        let propagator = ScorePropagator::new(store.clone());

        let mut handles = Vec::new();
        for (i, value) in [Vote::up("t1"), Vote::up("t1"), Vote::down("t1"), Vote::up("t2")]
            .into_iter()
            .enumerate()
        {
            let propagator = propagator.clone();
            handles.push(tokio::spawn(async move {
                let event = VoteListChange {
                    target: VoteTarget::Thread,
                    voter: format!("voter{i}@school.edu"),
                    before: None,
                    after: Some(VoteList::from(vec![value])),
                };
                propagator.propagate(&event).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.score(VoteTarget::Thread, "t1").unwrap(), Some(1));
        assert_eq!(store.score(VoteTarget::Thread, "t2").unwrap(), Some(1));
    }
}
