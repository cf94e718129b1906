pub mod class;
pub mod message;
pub mod thread;
pub mod user;
pub mod vote;

pub use class::MongoClassRepository;
pub use message::MongoMessageRepository;
pub use thread::MongoThreadRepository;
pub use user::MongoUserRepository;
pub use vote::MongoVoteRepository;
