//! Unit-of-work connection handling
//!
//! `DbConnectionHandler` opens a connection before the body of a unit of
//! work runs, registers it in the scope under its name with a transaction
//! open, and settles the transaction afterwards: commit when the body
//! succeeded, roll back when it failed. The connection is removed from the
//! scope and closed in both cases.

use std::sync::Arc;

use bizdate_core::provider::DEFAULT_TRANSACTION_NAME;
use bizdate_core::{DateError, Scope};

use crate::connection::{self, ConnectionFactory, ScopedConnection};
use crate::errors::Result;

/// Manages the named connection of one unit of work at a time
#[derive(Clone)]
pub struct DbConnectionHandler {
    name: String,
    factory: Arc<dyn ConnectionFactory>,
}

impl DbConnectionHandler {
    /// Handler registering its connection under the default transaction name
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        Self {
            name: DEFAULT_TRANSACTION_NAME.to_string(),
            factory,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open, register and begin the unit of work's connection
    ///
    /// # Errors
    ///
    /// Returns `ConnectionInUse` if the scope already holds a connection
    /// under this name, or a persistence error if it cannot be opened.
    pub fn before(&self, scope: &mut Scope) -> Result<()> {
        if scope.contains_key(&connection::connection_key(&self.name)) {
            return Err(DateError::ConnectionInUse {
                name: self.name.clone(),
            });
        }

        let mut conn = ScopedConnection::new(self.name.clone(), self.factory.open()?);
        conn.begin()?;
        connection::register(scope, conn)?;

        tracing::debug!(scope_id = %scope.id(), connection = %self.name, "unit of work connection opened");
        Ok(())
    }

    /// Settle and close the unit of work's connection
    ///
    /// There is no separate transaction handler in this pipeline, so the
    /// commit or rollback happens here before the connection is closed.
    /// Does nothing if no connection is registered under this name.
    ///
    /// # Errors
    ///
    /// Returns the commit or rollback failure, or the close failure.
    pub fn after(&self, scope: &mut Scope, succeeded: bool) -> Result<()> {
        let Some(mut conn) = connection::take(scope, &self.name) else {
            return Ok(());
        };

        let settled = if succeeded {
            conn.commit()
        } else {
            conn.rollback()
        };
        let closed = conn.terminate();

        tracing::debug!(
            scope_id = %scope.id(),
            connection = %self.name,
            committed = succeeded && settled.is_ok(),
            "unit of work connection closed"
        );
        settled.and(closed)
    }

    /// Run `body` between `before` and `after`
    ///
    /// # Errors
    ///
    /// Returns the body's error when it fails; a cleanup failure in that case
    /// is logged and dropped. When the body succeeds, a failure to commit or
    /// close is returned instead of its value.
    pub fn handle<T>(
        &self,
        scope: &mut Scope,
        body: impl FnOnce(&mut Scope) -> Result<T>,
    ) -> Result<T> {
        self.before(scope)?;

        match body(scope) {
            Ok(value) => {
                self.after(scope, true)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(cleanup_err) = self.after(scope, false) {
                    tracing::warn!(
                        scope_id = %scope.id(),
                        connection = %self.name,
                        error = %cleanup_err,
                        "unit of work cleanup failed after error"
                    );
                }
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for DbConnectionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConnectionHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
