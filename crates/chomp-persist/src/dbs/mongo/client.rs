use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::{Client, ClientSession};

use chomp_types::{
    new_id, normalize_email, ClassData, MessageData, NewClassData, NewMessageData, NewThreadData,
    NewUser, ResolveThread, Roster, ThreadData, UserProfile, VoteList, VoteListChange, VoteTarget,
};
use chomp_votes::ScoreDelta;

use crate::dbs::mongo::models::{MongoClass, MongoMessage, MongoRoster, MongoThread, MongoUser};
use crate::dbs::mongo::repositories::{
    MongoClassRepository, MongoMessageRepository, MongoThreadRepository, MongoUserRepository,
    MongoVoteRepository,
};
use crate::error::{PersistError, Result};
use crate::rules;
use crate::trait_client::ForumStore;

/// MongoDB-backed forum store.
///
/// Multi-document writes run inside a client session transaction, which
/// needs a replica set or sharded cluster on the server side.
pub struct MongoForumStore {
    client: Client,
    database: String,
    users: MongoUserRepository,
    classes: MongoClassRepository,
    threads: MongoThreadRepository,
    messages: MongoMessageRepository,
    votes: MongoVoteRepository,
}

impl MongoForumStore {
    /// Connect to MongoDB with default client options
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        Ok(Self::from_client(client, database))
    }

    pub fn from_client(client: Client, database: &str) -> Self {
        Self {
            users: MongoUserRepository::new(&client, database),
            classes: MongoClassRepository::new(&client, database),
            threads: MongoThreadRepository::new(&client, database),
            messages: MongoMessageRepository::new(&client, database),
            votes: MongoVoteRepository::new(&client, database),
            database: database.to_string(),
            client,
        }
    }

    async fn begin(&self) -> Result<ClientSession> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        Ok(session)
    }

    async fn register_user_in(&self, session: &mut ClientSession, user: NewUser) -> Result<UserProfile> {
        let email = normalize_email(&user.email);
        let matches = self.users.find_by_email(session, &email).await?;

        match matches.as_slice() {
            [] => {
                let profile = UserProfile {
                    id: new_id(),
                    uid: user.uid,
                    name: user.name,
                    email,
                    classes: Vec::new(),
                    created: Utc::now(),
                };
                self.users.insert(session, &MongoUser::from(profile.clone())).await?;
                Ok(profile)
            }
            [existing] => {
                let claimed = self
                    .users
                    .claim(session, &existing.id, &user.uid, user.name.as_deref())
                    .await?
                    .ok_or_else(|| PersistError::Internal(format!("profile {} vanished", existing.id)))?;
                Ok(claimed.into())
            }
            _ => Err(PersistError::DuplicateProfiles(email)),
        }
    }

    async fn create_class_in(
        &self,
        session: &mut ClientSession,
        request: NewClassData,
        participants: Vec<String>,
    ) -> Result<ClassData> {
        let class = ClassData::from_request(new_id(), &request, participants);
        let summary = class.summary();

        let existing = self.users.find_by_emails(session, &class.participants).await?;
        for email in &class.participants {
            match existing.iter().find(|u| u.email == *email) {
                Some(profile) => self.users.add_class(session, &profile.id, &summary).await?,
                None => {
                    let placeholder = UserProfile::placeholder(new_id(), email.clone(), summary.clone());
                    self.users.insert(session, &MongoUser::from(placeholder)).await?;
                }
            }
        }

        let roster = Roster {
            id: class.roster.clone(),
            class_id: class.id.clone(),
            participants: class.participants.clone(),
        };
        self.classes
            .insert(session, &MongoClass::from(class.clone()), &MongoRoster::from(roster))
            .await?;
        Ok(class)
    }

    async fn create_thread_in(
        &self,
        session: &mut ClientSession,
        author: String,
        request: NewThreadData,
    ) -> Result<ThreadData> {
        let class = self.classes.get_in(session, &request.class_id).await?.map(ClassData::from);
        let class = rules::check_new_thread(class, &author, &request)?;

        let thread = ThreadData::new(new_id(), &class, author, request);
        self.threads.insert(session, &MongoThread::from(thread.clone())).await?;
        Ok(thread)
    }

    async fn create_message_in(
        &self,
        session: &mut ClientSession,
        author: String,
        request: NewMessageData,
    ) -> Result<MessageData> {
        let class = self.classes.get_in(session, &request.class_id).await?.map(ClassData::from);
        let thread = self.threads.get_in(session, &request.thread_id).await?.map(ThreadData::from);
        let thread = rules::check_new_message(class, thread, &author, &request)?;

        let message = MessageData::new(new_id(), author, request);
        self.messages.insert(session, &MongoMessage::from(message.clone())).await?;
        self.threads.increment_messages(session, &thread.id).await?;
        Ok(message)
    }

    async fn resolve_thread_in(
        &self,
        session: &mut ClientSession,
        author_email: &str,
        resolve: ResolveThread,
    ) -> Result<ThreadData> {
        let thread = self.threads.get_in(session, &resolve.thread_id).await?.map(ThreadData::from);
        let message = self.messages.get_in(session, &resolve.message_id).await?.map(MessageData::from);
        let thread = rules::check_resolution(
            thread,
            message,
            author_email,
            &resolve.thread_id,
            &resolve.message_id,
        )?;

        self.threads
            .resolve(session, &thread.id, &resolve.message_id)
            .await?
            .map(ThreadData::from)
            .ok_or(PersistError::ThreadNotFound(thread.id))
    }

    async fn apply_score_deltas_in(
        &self,
        session: &mut ClientSession,
        target: VoteTarget,
        deltas: &[ScoreDelta],
    ) -> Result<()> {
        for ScoreDelta { target_id, delta } in deltas {
            let matched = match target {
                VoteTarget::Thread => self.threads.increment_score(session, target_id, *delta).await?,
                VoteTarget::Message => self.messages.increment_score(session, target_id, *delta).await?,
            };
            if !matched {
                return Err(PersistError::TargetNotFound {
                    collection: target.scored_collection(),
                    id: target_id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Commit on success, abort on failure. Abort errors are only logged;
/// the operation's error is returned.
async fn finish<T>(mut session: ClientSession, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            session.commit_transaction().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(abort_err) = session.abort_transaction().await {
                tracing::warn!(error = %abort_err, "Failed to abort transaction");
            }
            Err(err)
        }
    }
}

#[async_trait]
impl ForumStore for MongoForumStore {
    async fn register_user(&self, user: NewUser) -> Result<UserProfile> {
        let mut session = self.begin().await?;
        let result = self.register_user_in(&mut session, user).await;
        finish(session, result).await
    }

    async fn create_class(&self, request: NewClassData, participants: Vec<String>) -> Result<ClassData> {
        let mut session = self.begin().await?;
        let result = self.create_class_in(&mut session, request, participants).await;
        finish(session, result).await
    }

    async fn get_class(&self, class_id: &str) -> Result<Option<ClassData>> {
        Ok(self.classes.get(class_id).await?.map(ClassData::from))
    }

    async fn create_thread(&self, author_email: &str, request: NewThreadData) -> Result<ThreadData> {
        let author = normalize_email(author_email);
        let mut session = self.begin().await?;
        let result = self.create_thread_in(&mut session, author, request).await;
        finish(session, result).await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadData>> {
        Ok(self.threads.get(thread_id).await?.map(ThreadData::from))
    }

    async fn create_message(&self, author_email: &str, request: NewMessageData) -> Result<MessageData> {
        let author = normalize_email(author_email);
        let mut session = self.begin().await?;
        let result = self.create_message_in(&mut session, author, request).await;
        finish(session, result).await
    }

    async fn get_message(&self, message_id: &str) -> Result<Option<MessageData>> {
        Ok(self.messages.get(message_id).await?.map(MessageData::from))
    }

    async fn resolve_thread(&self, author_email: &str, resolve: ResolveThread) -> Result<ThreadData> {
        let mut session = self.begin().await?;
        let result = self.resolve_thread_in(&mut session, author_email, resolve).await;
        finish(session, result).await
    }

    async fn replace_votes(
        &self,
        target: VoteTarget,
        voter: &str,
        votes: VoteList,
    ) -> Result<VoteListChange> {
        let voter = normalize_email(voter);
        let previous = self.votes.replace(target, &voter, &votes).await?;
        Ok(VoteListChange {
            target,
            voter,
            before: previous.and_then(|doc| doc.votes),
            after: Some(votes),
        })
    }

    async fn apply_score_deltas(&self, target: VoteTarget, deltas: &[ScoreDelta]) -> Result<()> {
        let mut session = self.begin().await?;
        let result = self.apply_score_deltas_in(&mut session, target, deltas).await;
        finish(session, result).await
    }

    async fn purge_placeholder_users(&self, created_before: DateTime<Utc>) -> Result<u64> {
        let mut session = self.begin().await?;
        let result = self.users.delete_placeholders(&mut session, created_before).await;
        finish(session, result).await
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
