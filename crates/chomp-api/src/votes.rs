//! Vote-list change events.
//!
//! Handlers publish a [`VoteListChange`] after the caller's list is stored;
//! the worker turns each change into score increments on its own task.

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use chomp_persist::ScorePropagator;
use chomp_types::VoteListChange;

#[derive(Clone)]
pub struct VoteEventPublisher {
    sender: mpsc::Sender<VoteListChange>,
    propagator: ScorePropagator,
}

impl VoteEventPublisher {
    /// Queue a change for the worker without waiting.
    ///
    /// The vote list is already stored when this runs, so a change that
    /// cannot be queued is propagated inline instead of being dropped.
    pub async fn publish(&self, change: VoteListChange) {
        let change = match self.sender.try_send(change) {
            Ok(()) => return,
            Err(TrySendError::Full(change)) => {
                tracing::warn!(voter = %change.voter, "Vote event queue full, propagating inline");
                change
            }
            Err(TrySendError::Closed(change)) => {
                tracing::warn!(voter = %change.voter, "Vote event worker stopped, propagating inline");
                change
            }
        };

        // Failures are logged by the propagator with the voter and target kind.
        let _ = self.propagator.propagate(&change).await;
    }
}

pub struct VoteEventWorker {
    receiver: mpsc::Receiver<VoteListChange>,
    propagator: ScorePropagator,
}

impl VoteEventWorker {
    pub fn new(propagator: ScorePropagator, capacity: usize) -> (VoteEventPublisher, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let publisher = VoteEventPublisher {
            sender,
            propagator: propagator.clone(),
        };
        (publisher, Self { receiver, propagator })
    }

    /// Runs until every publisher is dropped. Each event gets its own task;
    /// failures are logged by the propagator and not retried.
    pub async fn run(mut self) {
        while let Some(change) = self.receiver.recv().await {
            let propagator = self.propagator.clone();
            tokio::spawn(async move {
                // Errors are already logged with the voter and target kind.
                let _ = propagator.propagate(&change).await;
            });
        }
        tracing::info!("Vote event worker stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use chomp_persist::{ForumStore, InMemoryForumStore};
    use chomp_types::{ClassData, NewClassData, NewThreadData, ThreadData, Vote, VoteList, VoteTarget};

    fn store_with_threads(ids: &[&str]) -> Arc<InMemoryForumStore> {
        let store = Arc::new(InMemoryForumStore::new());
        let class = ClassData::from_request(
            "c1".to_string(),
            &NewClassData {
                name: "Art".to_string(),
                ..Default::default()
            },
            vec!["t@school.edu".to_string()],
        );
        for id in ids {
            let thread = ThreadData::new(
                id.to_string(),
                &class,
                "t@school.edu".to_string(),
                NewThreadData {
                    class_id: "c1".to_string(),
                    title: format!("Perspective {id}"),
                    ..Default::default()
                },
            );
            store.insert_thread(thread).unwrap();
        }
        store
    }

    async fn vote_up(store: &InMemoryForumStore, voter: &str, id: &str) -> VoteListChange {
        store
            .replace_votes(VoteTarget::Thread, voter, VoteList::from(vec![Vote::up(id)]))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn published_changes_reach_the_store() {
        let store = store_with_threads(&["t1"]);
        let (publisher, worker) = VoteEventWorker::new(ScorePropagator::new(store.clone()), 8);
        let handle = worker.spawn();

        publisher.publish(vote_up(&store, "ann@school.edu", "t1").await).await;

        let mut score = None;
        for _ in 0..50 {
            score = store.score(VoteTarget::Thread, "t1").unwrap();
            if score == Some(1) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(score, Some(1));

        drop(publisher);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn stopped_worker_propagates_inline() {
        let store = store_with_threads(&["t1"]);
        let (publisher, worker) = VoteEventWorker::new(ScorePropagator::new(store.clone()), 8);
        drop(worker);

        publisher.publish(vote_up(&store, "ann@school.edu", "t1").await).await;

        assert_eq!(store.score(VoteTarget::Thread, "t1").unwrap(), Some(1));
    }

    #[tokio::test]
    async fn full_queue_propagates_inline() {
        let store = store_with_threads(&["t1", "t2"]);
        let (publisher, _worker) = VoteEventWorker::new(ScorePropagator::new(store.clone()), 1);

        // Worker not running: the first change sits in the queue.
        publisher.publish(vote_up(&store, "ann@school.edu", "t1").await).await;
        publisher.publish(vote_up(&store, "bob@school.edu", "t2").await).await;

        assert_eq!(store.score(VoteTarget::Thread, "t1").unwrap(), Some(0));
        assert_eq!(store.score(VoteTarget::Thread, "t2").unwrap(), Some(1));
    }
}
