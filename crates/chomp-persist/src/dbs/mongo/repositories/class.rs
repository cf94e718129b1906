use bson::doc;
use mongodb::{Client, ClientSession, Collection};

use crate::dbs::mongo::models::{MongoClass, MongoRoster};
use crate::error::Result;

#[derive(Clone)]
pub struct MongoClassRepository {
    classes: Collection<MongoClass>,
    rosters: Collection<MongoRoster>,
}

impl MongoClassRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let database = client.database(db_name);
        Self {
            classes: database.collection("classes"),
            rosters: database.collection("rosters"),
        }
    }

    /// Insert a class together with its roster
    pub async fn insert(
        &self,
        session: &mut ClientSession,
        class: &MongoClass,
        roster: &MongoRoster,
    ) -> Result<()> {
        self.classes.insert_one(class).session(&mut *session).await?;
        self.rosters.insert_one(roster).session(&mut *session).await?;
        Ok(())
    }

    pub async fn get(&self, class_id: &str) -> Result<Option<MongoClass>> {
        let filter = doc! { "_id": class_id };
        Ok(self.classes.find_one(filter).await?)
    }

    /// Read a class inside a transaction
    pub async fn get_in(
        &self,
        session: &mut ClientSession,
        class_id: &str,
    ) -> Result<Option<MongoClass>> {
        let filter = doc! { "_id": class_id };
        Ok(self.classes.find_one(filter).session(&mut *session).await?)
    }
}
