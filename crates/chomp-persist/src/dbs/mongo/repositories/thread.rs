use bson::doc;
use mongodb::{options::ReturnDocument, Client, ClientSession, Collection};

use crate::dbs::mongo::models::MongoThread;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoThreadRepository {
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("threads");
        Self { collection }
    }

    pub async fn insert(&self, session: &mut ClientSession, thread: &MongoThread) -> Result<()> {
        self.collection.insert_one(thread).session(&mut *session).await?;
        Ok(())
    }

    /// Get thread by ID
    pub async fn get(&self, thread_id: &str) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Read a thread inside a transaction
    pub async fn get_in(
        &self,
        session: &mut ClientSession,
        thread_id: &str,
    ) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id };
        Ok(self.collection.find_one(filter).session(&mut *session).await?)
    }

    pub async fn increment_messages(&self, session: &mut ClientSession, thread_id: &str) -> Result<()> {
        let filter = doc! { "_id": thread_id };
        let update = doc! { "$inc": { "num_messages": 1_i64 } };
        self.collection.update_one(filter, update).session(&mut *session).await?;
        Ok(())
    }

    /// Close the thread with an accepted answer, returning the updated thread
    pub async fn resolve(
        &self,
        session: &mut ClientSession,
        thread_id: &str,
        answer_id: &str,
    ) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id };
        let update = doc! { "$set": { "is_closed": true, "answer_id": answer_id } };
        let thread = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .session(&mut *session)
            .await?;
        Ok(thread)
    }

    /// Atomically add `delta` to the thread score. Returns false when no thread matched.
    pub async fn increment_score(
        &self,
        session: &mut ClientSession,
        thread_id: &str,
        delta: i64,
    ) -> Result<bool> {
        let filter = doc! { "_id": thread_id };
        let update = doc! { "$inc": { "score": delta } };
        let result = self.collection.update_one(filter, update).session(&mut *session).await?;
        Ok(result.matched_count > 0)
    }
}
