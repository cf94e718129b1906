//! Persistence for the Chomp forum.
//!
//! [`ForumStore`] is the storage seam. [`InMemoryForumStore`] backs tests and
//! local runs; `MongoForumStore` (feature `mongodb`) backs production.
//! [`ScorePropagator`] turns vote-list changes into score increments.

pub mod error;
pub mod memory;
pub mod propagator;
pub mod rules;
pub mod trait_client;

#[cfg(feature = "mongodb")]
pub mod builder;
#[cfg(feature = "mongodb")]
pub mod dbs;

pub use error::{PersistError, Result};
pub use memory::InMemoryForumStore;
pub use propagator::{PropagationOutcome, ScorePropagator};
pub use trait_client::ForumStore;

#[cfg(feature = "mongodb")]
pub use builder::MongoForumStoreBuilder;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoForumStore;
