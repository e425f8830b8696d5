//! Rollcall DB — SurrealDB connection management, schema migrations,
//! and the SurrealDB-backed [`SessionStore`] implementation.
//!
//! [`SessionStore`]: rollcall_core::store::SessionStore

mod connection;
mod error;
mod schema;
mod store;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::run_migrations;
pub use store::SurrealSessionStore;
