pub mod classes;
pub mod classroom;
pub mod health;
pub mod messages;
pub mod threads;
pub mod users;
pub mod votes;
