//! bizdate Store - SQLite persistence for business dates
//!
//! Provides:
//! - Connection opening and configuration (WAL, busy timeout)
//! - Embedded schema migrations with checksums
//! - Connections registered in a unit-of-work `Scope` and the handler that
//!   manages their transaction
//! - A short-lived transaction executor for work outside such a scope
//! - `SqliteRowStore`, the `RowStore` used in production
//! - `StringResourceLoader`, which reads localized strings per id

pub mod connection;
pub mod db;
pub mod errors;
pub mod handler;
pub mod migrations;
pub mod repo;
pub mod transaction;

// Re-export key types
pub use connection::{ConnectionFactory, ScopedConnection, SqliteConnectionFactory};
pub use errors::Result;
pub use handler::DbConnectionHandler;
pub use repo::{SqliteRowStore, StringResource, StringResourceConfig, StringResourceLoader};
pub use transaction::SimpleTransactionExecutor;
