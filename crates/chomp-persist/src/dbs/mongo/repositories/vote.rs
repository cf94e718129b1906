use bson::doc;
use mongodb::{options::ReturnDocument, Client, Collection};

use chomp_types::{VoteList, VoteTarget};

use crate::dbs::mongo::models::MongoVoteList;
use crate::error::Result;

/// Per-voter vote lists, one collection per target kind
#[derive(Clone)]
pub struct MongoVoteRepository {
    thread_votes: Collection<MongoVoteList>,
    message_votes: Collection<MongoVoteList>,
}

impl MongoVoteRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let database = client.database(db_name);
        Self {
            thread_votes: database.collection(VoteTarget::Thread.votes_collection()),
            message_votes: database.collection(VoteTarget::Message.votes_collection()),
        }
    }

    fn collection(&self, target: VoteTarget) -> &Collection<MongoVoteList> {
        match target {
            VoteTarget::Thread => &self.thread_votes,
            VoteTarget::Message => &self.message_votes,
        }
    }

    /// Overwrite the voter's list, returning the document as it was before
    pub async fn replace(
        &self,
        target: VoteTarget,
        voter: &str,
        votes: &VoteList,
    ) -> Result<Option<MongoVoteList>> {
        let filter = doc! { "_id": voter };
        let update = doc! { "$set": { "votes": bson::to_bson(votes)? } };
        let previous = self
            .collection(target)
            .find_one_and_update(filter, update)
            .upsert(true)
            .return_document(ReturnDocument::Before)
            .await?;
        Ok(previous)
    }
}
