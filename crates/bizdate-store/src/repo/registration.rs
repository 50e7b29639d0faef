//! Administrative creation of segment rows
//!
//! Providers only ever update existing rows. New segments are added here, by
//! setup tooling, before any provider reads them.

use bizdate_core::date_format;
use bizdate_core::errors::ArgumentField;
use bizdate_core::{DateError, DateQueries};
use rusqlite::Connection;

use crate::errors::{persistence, Result};

/// Insert a new segment row using the table layout of `queries`
///
/// # Errors
///
/// Rejects an empty segment and a date that is not a valid `yyyyMMdd`
/// calendar date. A segment that already exists fails with a persistence
/// error from the primary key.
pub fn insert_segment(
    conn: &Connection,
    queries: &DateQueries,
    segment: &str,
    date: &str,
) -> Result<()> {
    if segment.is_empty() {
        return Err(DateError::EmptyArgument {
            field: ArgumentField::Segment,
        });
    }
    if !date_format::is_valid(date) {
        return Err(DateError::MalformedDate {
            value: date.to_string(),
        });
    }

    let sql = format!(
        "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
        queries.table_name, queries.segment_column, queries.date_column
    );
    conn.execute(&sql, rusqlite::params![segment, date])
        .map_err(|e| persistence("insert_segment", e))?;

    tracing::debug!(segment, date, "segment registered");
    Ok(())
}
