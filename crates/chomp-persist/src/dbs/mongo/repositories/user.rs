use bson::doc;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{options::ReturnDocument, Client, ClientSession, Collection};

use chomp_types::ClassSummary;

use crate::dbs::mongo::models::MongoUser;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<MongoUser>,
}

impl MongoUserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    /// All profiles registered under `email`
    pub async fn find_by_email(
        &self,
        session: &mut ClientSession,
        email: &str,
    ) -> Result<Vec<MongoUser>> {
        let filter = doc! { "email": email };
        let mut cursor = self.collection.find(filter).session(&mut *session).await?;
        let users = cursor.stream(&mut *session).try_collect().await?;
        Ok(users)
    }

    /// Profiles whose email is in `emails`
    pub async fn find_by_emails(
        &self,
        session: &mut ClientSession,
        emails: &[String],
    ) -> Result<Vec<MongoUser>> {
        let filter = doc! { "email": { "$in": emails } };
        let mut cursor = self.collection.find(filter).session(&mut *session).await?;
        let users = cursor.stream(&mut *session).try_collect().await?;
        Ok(users)
    }

    pub async fn insert(&self, session: &mut ClientSession, user: &MongoUser) -> Result<()> {
        self.collection.insert_one(user).session(&mut *session).await?;
        Ok(())
    }

    /// Attach a signed-up identity to an existing profile
    pub async fn claim(
        &self,
        session: &mut ClientSession,
        id: &str,
        uid: &str,
        name: Option<&str>,
    ) -> Result<Option<MongoUser>> {
        let filter = doc! { "_id": id };
        let update = doc! {
            "$set": {
                "uid": uid,
                "name": name,
                "created": bson::DateTime::now(),
            }
        };
        let user = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .session(&mut *session)
            .await?;
        Ok(user)
    }

    /// Add a class to the profile's class list (no duplicates)
    pub async fn add_class(
        &self,
        session: &mut ClientSession,
        id: &str,
        class: &ClassSummary,
    ) -> Result<()> {
        let filter = doc! { "_id": id };
        let update = doc! { "$addToSet": { "classes": bson::to_bson(class)? } };
        self.collection.update_one(filter, update).session(&mut *session).await?;
        Ok(())
    }

    /// Delete placeholder profiles created before `created_before`
    pub async fn delete_placeholders(
        &self,
        session: &mut ClientSession,
        created_before: DateTime<Utc>,
    ) -> Result<u64> {
        let filter = doc! {
            "uid": "",
            "created": { "$lt": bson::DateTime::from_chrono(created_before) },
        };
        let result = self.collection.delete_many(filter).session(&mut *session).await?;
        Ok(result.deleted_count)
    }
}
