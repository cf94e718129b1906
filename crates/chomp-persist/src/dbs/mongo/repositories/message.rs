use bson::doc;
use mongodb::{Client, ClientSession, Collection};

use crate::dbs::mongo::models::MongoMessage;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

impl MongoMessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    /// Save a single message
    pub async fn insert(&self, session: &mut ClientSession, message: &MongoMessage) -> Result<()> {
        self.collection.insert_one(message).session(&mut *session).await?;
        Ok(())
    }

    pub async fn get(&self, message_id: &str) -> Result<Option<MongoMessage>> {
        let filter = doc! { "_id": message_id };
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn get_in(
        &self,
        session: &mut ClientSession,
        message_id: &str,
    ) -> Result<Option<MongoMessage>> {
        let filter = doc! { "_id": message_id };
        Ok(self.collection.find_one(filter).session(&mut *session).await?)
    }

    /// Atomically add `delta` to the message score. Returns false when no message matched.
    pub async fn increment_score(
        &self,
        session: &mut ClientSession,
        message_id: &str,
        delta: i64,
    ) -> Result<bool> {
        let filter = doc! { "_id": message_id };
        let update = doc! { "$inc": { "score": delta } };
        let result = self.collection.update_one(filter, update).session(&mut *session).await?;
        Ok(result.matched_count > 0)
    }
}
