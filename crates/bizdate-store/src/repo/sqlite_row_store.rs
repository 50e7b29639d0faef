//! `RowStore` over SQLite
//!
//! Each call runs on the connection registered in the scope under the
//! queries' transaction name when there is one, so it sees and joins that
//! unit of work's transaction. Otherwise it runs in a short-lived transaction
//! of its own.

use std::sync::Arc;

use bizdate_core::{BusinessDate, DateQueries, RowStore, Scope};
use rusqlite::{Connection, OptionalExtension};

use crate::connection::ConnectionFactory;
use crate::errors::{persistence, Result};
use crate::repo::registration;
use crate::transaction::SimpleTransactionExecutor;

/// Production row store
#[derive(Debug, Clone)]
pub struct SqliteRowStore {
    executor: SimpleTransactionExecutor,
}

impl SqliteRowStore {
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        Self {
            executor: SimpleTransactionExecutor::new(factory),
        }
    }

    /// Insert a new segment row through the same connection routing as reads
    ///
    /// # Errors
    ///
    /// See [`registration::insert_segment`].
    pub fn register_segment(
        &self,
        scope: &mut Scope,
        queries: &DateQueries,
        segment: &str,
        date: &str,
    ) -> Result<()> {
        self.run(scope, queries, |conn| {
            registration::insert_segment(conn, queries, segment, date)
        })
    }

    fn run<T>(
        &self,
        scope: &Scope,
        queries: &DateQueries,
        work: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        self.executor
            .execute_in(scope, &queries.transaction_name, work)
    }
}

impl RowStore for SqliteRowStore {
    fn select_by_segment(
        &self,
        scope: &mut Scope,
        queries: &DateQueries,
        segment: &str,
    ) -> Result<Option<BusinessDate>> {
        self.run(scope, queries, |conn| {
            let date: Option<String> = conn
                .query_row(&queries.select_by_segment, [segment], |row| {
                    row.get(queries.date_column.as_str())
                })
                .optional()
                .map_err(|e| persistence("select_by_segment", e))?;
            Ok(date.map(|date| BusinessDate::new(segment, date)))
        })
    }

    fn select_all(&self, scope: &mut Scope, queries: &DateQueries) -> Result<Vec<BusinessDate>> {
        self.run(scope, queries, |conn| {
            let mut stmt = conn
                .prepare(&queries.select_all)
                .map_err(|e| persistence("select_all", e))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(BusinessDate::new(
                        row.get::<_, String>(queries.segment_column.as_str())?,
                        row.get::<_, String>(queries.date_column.as_str())?,
                    ))
                })
                .map_err(|e| persistence("select_all", e))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| persistence("select_all", e))?;
            Ok(rows)
        })
    }

    fn update_by_segment(
        &self,
        scope: &mut Scope,
        queries: &DateQueries,
        segment: &str,
        date: &str,
    ) -> Result<usize> {
        self.run(scope, queries, |conn| {
            conn.execute(&queries.update_by_segment, [date, segment])
                .map_err(|e| persistence("update_by_segment", e))
        })
    }
}
