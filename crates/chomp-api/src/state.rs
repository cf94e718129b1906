use std::sync::Arc;

use chomp_classroom::ClassroomClient;
use chomp_persist::ForumStore;

use crate::config::Config;
use crate::votes::VoteEventPublisher;

/// Shared application state passed to all handlers
///
/// The store handle is created once at startup and shared by every request
/// and background task.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ForumStore>,
    pub classroom: ClassroomClient,
    pub votes: VoteEventPublisher,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ForumStore>,
        classroom: ClassroomClient,
        votes: VoteEventPublisher,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            classroom,
            votes,
        }
    }
}
