pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod openapi;
pub mod purge;
pub mod router;
pub mod routes;
pub mod state;
pub mod votes;

pub use router::build_router;
