//! # tokengate-database
//!
//! PostgreSQL connection management, the migration runner and the user
//! repository backing the credential store.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
