use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chomp_types::{
    new_id, normalize_email, ClassData, MessageData, NewClassData, NewMessageData, NewThreadData,
    NewUser, ResolveThread, Roster, ThreadData, UserProfile, VoteList, VoteListChange, VoteTarget,
};
use chomp_votes::ScoreDelta;

use crate::error::{PersistError, Result};
use crate::rules;
use crate::trait_client::ForumStore;

/// In-memory forum store for tests, local demos, and embedding.
///
/// Each operation works on a copy of the state and swaps it in only on
/// success, so a failing operation leaves nothing behind.
#[derive(Default)]
pub struct InMemoryForumStore {
    inner: RwLock<ForumState>,
}

#[derive(Default, Clone)]
struct ForumState {
    users: BTreeMap<String, UserProfile>,
    classes: HashMap<String, ClassData>,
    rosters: HashMap<String, Roster>,
    threads: HashMap<String, ThreadData>,
    messages: HashMap<String, MessageData>,
    votes: HashMap<(VoteTarget, String), VoteList>,
}

impl InMemoryForumStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn transaction<T>(&self, op: impl FnOnce(&mut ForumState) -> Result<T>) -> Result<T> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| PersistError::Internal("forum state lock poisoned".to_string()))?;
        let mut draft = state.clone();
        let value = op(&mut draft)?;
        *state = draft;
        Ok(value)
    }

    fn read<T>(&self, op: impl FnOnce(&ForumState) -> T) -> Result<T> {
        let state = self
            .inner
            .read()
            .map_err(|_| PersistError::Internal("forum state lock poisoned".to_string()))?;
        Ok(op(&state))
    }

    /// Seed or overwrite a profile.
    pub fn insert_user(&self, profile: UserProfile) -> Result<()> {
        self.transaction(|state| {
            state.users.insert(profile.id.clone(), profile);
            Ok(())
        })
    }

    /// Seed or overwrite a class.
    pub fn insert_class(&self, class: ClassData) -> Result<()> {
        self.transaction(|state| {
            state.classes.insert(class.id.clone(), class);
            Ok(())
        })
    }

    /// Seed or overwrite a thread.
    pub fn insert_thread(&self, thread: ThreadData) -> Result<()> {
        self.transaction(|state| {
            state.threads.insert(thread.id.clone(), thread);
            Ok(())
        })
    }

    /// Seed or overwrite a message.
    pub fn insert_message(&self, message: MessageData) -> Result<()> {
        self.transaction(|state| {
            state.messages.insert(message.id.clone(), message);
            Ok(())
        })
    }

    pub fn users_with_email(&self, email: &str) -> Result<Vec<UserProfile>> {
        let email = normalize_email(email);
        self.read(|state| {
            state
                .users
                .values()
                .filter(|u| u.email == email)
                .cloned()
                .collect()
        })
    }

    pub fn user_count(&self) -> Result<usize> {
        self.read(|state| state.users.len())
    }

    pub fn roster(&self, class_id: &str) -> Result<Option<Roster>> {
        self.read(|state| state.rosters.get(class_id).cloned())
    }

    pub fn votes(&self, target: VoteTarget, voter: &str) -> Result<Option<VoteList>> {
        self.read(|state| state.votes.get(&(target, voter.to_string())).cloned())
    }

    /// Current score of a thread or message, if it exists.
    pub fn score(&self, target: VoteTarget, id: &str) -> Result<Option<i64>> {
        self.read(|state| match target {
            VoteTarget::Thread => state.threads.get(id).map(|t| t.score),
            VoteTarget::Message => state.messages.get(id).map(|m| m.score),
        })
    }
}

#[async_trait]
impl ForumStore for InMemoryForumStore {
    async fn register_user(&self, user: NewUser) -> Result<UserProfile> {
        let email = normalize_email(&user.email);
        self.transaction(|state| {
            let matches: Vec<String> = state
                .users
                .values()
                .filter(|u| u.email == email)
                .map(|u| u.id.clone())
                .collect();

            let profile = match matches.as_slice() {
                [] => {
                    let profile = UserProfile {
                        id: new_id(),
                        uid: user.uid,
                        name: user.name,
                        email,
                        classes: Vec::new(),
                        created: Utc::now(),
                    };
                    state.users.insert(profile.id.clone(), profile.clone());
                    profile
                }
                [id] => {
                    let profile = state
                        .users
                        .get_mut(id)
                        .ok_or_else(|| PersistError::Internal(format!("profile {id} vanished")))?;
                    profile.uid = user.uid;
                    profile.name = user.name;
                    profile.created = Utc::now();
                    profile.clone()
                }
                _ => return Err(PersistError::DuplicateProfiles(email)),
            };
            Ok(profile)
        })
    }

    async fn create_class(&self, request: NewClassData, participants: Vec<String>) -> Result<ClassData> {
        self.transaction(|state| {
            let class = ClassData::from_request(new_id(), &request, participants);
            let summary = class.summary();

            for email in &class.participants {
                let existing = state.users.values_mut().find(|u| u.email == *email);
                match existing {
                    Some(profile) => {
                        if !profile.classes.contains(&summary) {
                            profile.classes.push(summary.clone());
                        }
                    }
                    None => {
                        let profile = UserProfile::placeholder(new_id(), email.clone(), summary.clone());
                        state.users.insert(profile.id.clone(), profile);
                    }
                }
            }

            state.rosters.insert(
                class.roster.clone(),
                Roster {
                    id: class.roster.clone(),
                    class_id: class.id.clone(),
                    participants: class.participants.clone(),
                },
            );
            state.classes.insert(class.id.clone(), class.clone());
            Ok(class)
        })
    }

    async fn get_class(&self, class_id: &str) -> Result<Option<ClassData>> {
        self.read(|state| state.classes.get(class_id).cloned())
    }

    async fn create_thread(&self, author_email: &str, request: NewThreadData) -> Result<ThreadData> {
        let author = normalize_email(author_email);
        self.transaction(|state| {
            let class = state.classes.get(&request.class_id).cloned();
            let class = rules::check_new_thread(class, &author, &request)?;

            let thread = ThreadData::new(new_id(), &class, author, request);
            state.threads.insert(thread.id.clone(), thread.clone());
            Ok(thread)
        })
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadData>> {
        self.read(|state| state.threads.get(thread_id).cloned())
    }

    async fn create_message(&self, author_email: &str, request: NewMessageData) -> Result<MessageData> {
        let author = normalize_email(author_email);
        self.transaction(|state| {
            let class = state.classes.get(&request.class_id).cloned();
            let thread = state.threads.get(&request.thread_id).cloned();
            let thread = rules::check_new_message(class, thread, &author, &request)?;

            if let Some(stored) = state.threads.get_mut(&thread.id) {
                stored.num_messages += 1;
            }

            let message = MessageData::new(new_id(), author, request);
            state.messages.insert(message.id.clone(), message.clone());
            Ok(message)
        })
    }

    async fn get_message(&self, message_id: &str) -> Result<Option<MessageData>> {
        self.read(|state| state.messages.get(message_id).cloned())
    }

    async fn resolve_thread(&self, author_email: &str, resolve: ResolveThread) -> Result<ThreadData> {
        self.transaction(|state| {
            let thread = state.threads.get(&resolve.thread_id).cloned();
            let message = state.messages.get(&resolve.message_id).cloned();
            let thread = rules::check_resolution(
                thread,
                message,
                author_email,
                &resolve.thread_id,
                &resolve.message_id,
            )?;

            let stored = state
                .threads
                .get_mut(&thread.id)
                .ok_or_else(|| PersistError::ThreadNotFound(thread.id.clone()))?;
            stored.is_closed = true;
            stored.answer_id = Some(resolve.message_id);
            Ok(stored.clone())
        })
    }

    async fn replace_votes(
        &self,
        target: VoteTarget,
        voter: &str,
        votes: VoteList,
    ) -> Result<VoteListChange> {
        let voter = normalize_email(voter);
        self.transaction(|state| {
            let before = state.votes.insert((target, voter.clone()), votes.clone());
            Ok(VoteListChange {
                target,
                voter,
                before,
                after: Some(votes),
            })
        })
    }

    async fn apply_score_deltas(&self, target: VoteTarget, deltas: &[ScoreDelta]) -> Result<()> {
        self.transaction(|state| {
            for ScoreDelta { target_id, delta } in deltas {
                let score = match target {
                    VoteTarget::Thread => state.threads.get_mut(target_id).map(|t| &mut t.score),
                    VoteTarget::Message => state.messages.get_mut(target_id).map(|m| &mut m.score),
                };
                let score = score.ok_or_else(|| PersistError::TargetNotFound {
                    collection: target.scored_collection(),
                    id: target_id.clone(),
                })?;
                *score += delta;
            }
            Ok(())
        })
    }

    async fn purge_placeholder_users(&self, created_before: DateTime<Utc>) -> Result<u64> {
        self.transaction(|state| {
            let before = state.users.len();
            state
                .users
                .retain(|_, u| !(u.is_placeholder() && u.created < created_before));
            Ok((before - state.users.len()) as u64)
        })
    }

    async fn ping(&self) -> Result<()> {
        self.read(|_| ())
    }
}
