//! Row store seam
//!
//! The provider never talks to a database directly. It compiles its
//! statements once into [`DateQueries`] and hands them, together with the
//! caller's [`Scope`], to a [`RowStore`]. The store decides whether to run
//! them on a connection already registered in the scope under
//! `DateQueries::transaction_name` or on a short-lived transaction of its
//! own.

pub mod memory;

pub use memory::InMemoryRowStore;

use crate::errors::Result;
use crate::model::BusinessDate;
use crate::scope::Scope;

/// Statements compiled by `BasicBusinessDateProvider::initialize`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateQueries {
    pub table_name: String,
    pub segment_column: String,
    pub date_column: String,
    /// Selects the date column for one segment (`?1` = segment)
    pub select_by_segment: String,
    /// Selects segment and date columns of every row
    pub select_all: String,
    /// Updates the date of one segment (`?1` = date, `?2` = segment)
    pub update_by_segment: String,
    /// Name under which the unit of work registers its connection
    pub transaction_name: String,
}

/// Table of `(segment, date)` rows
pub trait RowStore: Send + Sync {
    /// Read the row of one segment
    fn select_by_segment(
        &self,
        scope: &mut Scope,
        queries: &DateQueries,
        segment: &str,
    ) -> Result<Option<BusinessDate>>;

    /// Read every row
    fn select_all(&self, scope: &mut Scope, queries: &DateQueries) -> Result<Vec<BusinessDate>>;

    /// Replace the date of one segment, returning the number of rows changed
    fn update_by_segment(
        &self,
        scope: &mut Scope,
        queries: &DateQueries,
        segment: &str,
        date: &str,
    ) -> Result<usize>;
}
