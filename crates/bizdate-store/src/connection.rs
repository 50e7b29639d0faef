//! Named connections and their registration in a unit-of-work scope
//!
//! A unit of work that wants every read and write to share one transaction
//! registers a `ScopedConnection` in its `Scope` under the transaction name.
//! `SqliteRowStore` looks the name up and joins that connection; without one
//! it falls back to a short-lived transaction of its own.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bizdate_core::{DateError, Scope};
use rusqlite::Connection;

use crate::db;
use crate::errors::{persistence, Result};

/// Scope key prefix of registered connections
pub const CONNECTION_KEY_PREFIX: &str = "db_connection.";

/// Scope key under which the connection named `name` is registered
pub fn connection_key(name: &str) -> String {
    format!("{}{}", CONNECTION_KEY_PREFIX, name)
}

/// Opens fresh database connections
pub trait ConnectionFactory: Send + Sync {
    /// Open and configure a new connection
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened or configured.
    fn open(&self) -> Result<Connection>;
}

/// Factory for a file-backed SQLite database
#[derive(Debug, Clone)]
pub struct SqliteConnectionFactory {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteConnectionFactory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: db::DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionFactory for SqliteConnectionFactory {
    fn open(&self) -> Result<Connection> {
        let conn = db::open(&self.path)?;
        db::configure(&conn, self.busy_timeout)?;
        Ok(conn)
    }
}

/// Connection owned by one unit of work
///
/// Transactions are driven with explicit `BEGIN`/`COMMIT`/`ROLLBACK` so the
/// connection can live in the scope without a borrowing transaction guard.
#[derive(Debug)]
pub struct ScopedConnection {
    name: String,
    conn: Connection,
    in_transaction: bool,
}

impl ScopedConnection {
    pub fn new(name: impl Into<String>, conn: Connection) -> Self {
        Self {
            name: name.into(),
            conn,
            in_transaction: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn is_in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Start a transaction
    ///
    /// # Errors
    ///
    /// Fails if a transaction is already open or SQLite refuses to begin one.
    pub fn begin(&mut self) -> Result<()> {
        if self.in_transaction {
            return Err(DateError::Persistence {
                op: "begin".to_string(),
                message: format!("connection {} already has an open transaction", self.name),
            });
        }
        self.conn
            .execute_batch("BEGIN")
            .map_err(|e| persistence("begin", e))?;
        self.in_transaction = true;
        Ok(())
    }

    /// Commit the open transaction, if any
    ///
    /// # Errors
    ///
    /// Fails if SQLite cannot commit, in which case the transaction stays
    /// open until `rollback` or `terminate`.
    pub fn commit(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Ok(());
        }
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| persistence("commit", e))?;
        self.in_transaction = false;
        Ok(())
    }

    /// Roll back the open transaction, if any
    ///
    /// # Errors
    ///
    /// Fails if SQLite cannot roll back.
    pub fn rollback(&mut self) -> Result<()> {
        if !self.in_transaction {
            return Ok(());
        }
        self.in_transaction = false;
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| persistence("rollback", e))
    }

    /// Roll back anything still open and close the connection
    ///
    /// # Errors
    ///
    /// Fails if the rollback or the close fails; the connection is gone
    /// either way.
    pub fn terminate(mut self) -> Result<()> {
        let rolled_back = self.rollback();
        let closed = self
            .conn
            .close()
            .map_err(|(_, e)| persistence("close", e));
        rolled_back.and(closed)
    }
}

/// Register `conn` in `scope` under its name
///
/// # Errors
///
/// Returns `ConnectionInUse` if the scope already holds a connection with
/// that name; the new connection is closed.
pub fn register(scope: &mut Scope, conn: ScopedConnection) -> Result<()> {
    let key = connection_key(conn.name());
    if scope.contains_key(&key) {
        let name = conn.name().to_string();
        if let Err(e) = conn.terminate() {
            tracing::warn!(connection = %name, error = %e, "failed to close rejected connection");
        }
        return Err(DateError::ConnectionInUse { name });
    }
    scope.set(key, conn);
    Ok(())
}

/// Connection registered in `scope` under `name`
pub fn scoped_connection<'a>(scope: &'a Scope, name: &str) -> Option<&'a ScopedConnection> {
    scope.get::<ScopedConnection>(&connection_key(name))
}

/// Remove and return the connection registered under `name`
pub fn take(scope: &mut Scope, name: &str) -> Option<ScopedConnection> {
    scope.remove::<ScopedConnection>(&connection_key(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_connection(name: &str) -> ScopedConnection {
        ScopedConnection::new(name, db::open_in_memory().unwrap())
    }

    #[test]
    fn test_register_and_take() {
        let mut scope = Scope::new();
        register(&mut scope, memory_connection("transaction")).unwrap();

        assert!(scope.contains_key("db_connection.transaction"));
        assert_eq!(
            scoped_connection(&scope, "transaction").map(|c| c.name()),
            Some("transaction")
        );

        let conn = take(&mut scope, "transaction").unwrap();
        assert!(scope.is_empty());
        conn.terminate().unwrap();
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut scope = Scope::new();
        register(&mut scope, memory_connection("transaction")).unwrap();

        let err = register(&mut scope, memory_connection("transaction")).unwrap_err();
        assert_eq!(
            err,
            DateError::ConnectionInUse {
                name: "transaction".to_string()
            }
        );
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_begin_commit_rollback_state() {
        let mut conn = memory_connection("t");
        conn.begin().unwrap();
        assert!(conn.is_in_transaction());
        assert!(conn.begin().is_err());

        conn.commit().unwrap();
        assert!(!conn.is_in_transaction());
        conn.rollback().unwrap();

        conn.begin().unwrap();
        conn.terminate().unwrap();
    }
}
