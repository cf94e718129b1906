use std::time::Duration;

use mongodb::{options::ClientOptions, Client};

use crate::dbs::mongo::MongoForumStore;
use crate::error::{PersistError, Result};

pub struct MongoForumStoreBuilder {
    mongodb_uri: Option<String>,
    database: Option<String>,
    max_pool_size: u32,
    connect_timeout: Duration,
    app_name: Option<String>,
}

impl MongoForumStoreBuilder {
    pub fn new() -> Self {
        Self {
            mongodb_uri: None,
            database: None,
            max_pool_size: 10,
            connect_timeout: Duration::from_secs(10),
            app_name: None,
        }
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub fn max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Applies to both connecting and server selection
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub async fn build(self) -> Result<MongoForumStore> {
        let mongodb_uri = self
            .mongodb_uri
            .ok_or_else(|| PersistError::Internal("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .ok_or_else(|| PersistError::Internal("database is required".to_string()))?;

        let mut options = ClientOptions::parse(&mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        options.max_pool_size = Some(self.max_pool_size);
        options.connect_timeout = Some(self.connect_timeout);
        options.server_selection_timeout = Some(self.connect_timeout);
        options.app_name = self.app_name;

        let client = Client::with_options(options).map_err(|e| PersistError::Connection(e.to_string()))?;
        tracing::info!(database = %database, pool = self.max_pool_size, "MongoDB client configured");
        Ok(MongoForumStore::from_client(client, &database))
    }
}

impl Default for MongoForumStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
