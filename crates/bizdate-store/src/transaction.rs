//! Short-lived transactions for work outside a registered connection

use std::sync::Arc;

use bizdate_core::Scope;
use rusqlite::Connection;

use crate::connection::{self, ConnectionFactory};
use crate::errors::{persistence, Result};

/// Runs one unit of database work in its own connection and transaction
///
/// The connection is opened per call and closed before returning. The work
/// is committed when it succeeds and rolled back when it fails.
#[derive(Clone)]
pub struct SimpleTransactionExecutor {
    factory: Arc<dyn ConnectionFactory>,
}

impl SimpleTransactionExecutor {
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        Self { factory }
    }

    /// Run `work` inside a fresh transaction
    ///
    /// # Errors
    ///
    /// Returns the error of `work`, or a persistence error if the connection
    /// cannot be opened or the commit fails.
    pub fn execute<T>(&self, work: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.factory.open()?;
        let tx = conn
            .transaction()
            .map_err(|e| persistence("begin", e))?;

        match work(&tx) {
            Ok(value) => {
                tx.commit().map_err(|e| persistence("commit", e))?;
                tracing::debug!("short-lived transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!(error = %rollback_err, "short-lived transaction rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Run `work` on the scope's connection named `transaction_name`, or in
    /// a fresh transaction when the scope holds none
    ///
    /// # Errors
    ///
    /// Same as [`SimpleTransactionExecutor::execute`].
    pub fn execute_in<T>(
        &self,
        scope: &Scope,
        transaction_name: &str,
        work: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        match connection::scoped_connection(scope, transaction_name) {
            Some(scoped) => work(scoped.connection()),
            None => self.execute(work),
        }
    }
}

impl std::fmt::Debug for SimpleTransactionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleTransactionExecutor").finish_non_exhaustive()
    }
}
