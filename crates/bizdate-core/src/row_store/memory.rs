use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::{DateError, Result};
use crate::model::BusinessDate;
use crate::row_store::{DateQueries, RowStore};
use crate::scope::Scope;

/// In-memory row store
///
/// Ignores the SQL text of `DateQueries` and keeps rows in a map. Every call
/// is counted so callers can observe how often the provider actually reached
/// the store.
#[derive(Debug, Default)]
pub struct InMemoryRowStore {
    rows: Mutex<BTreeMap<String, String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given rows
    pub fn with_rows(rows: impl IntoIterator<Item = BusinessDate>) -> Self {
        let store = Self::new();
        store.replace_all(rows);
        store
    }

    /// Insert or overwrite one row directly, bypassing any provider
    pub fn put(&self, segment: impl Into<String>, date: impl Into<String>) {
        self.rows
            .lock()
            .map(|mut rows| {
                rows.insert(segment.into(), date.into());
            })
            .ok();
    }

    /// Replace the whole table
    pub fn replace_all(&self, rows: impl IntoIterator<Item = BusinessDate>) {
        let fresh: BTreeMap<String, String> =
            rows.into_iter().map(|r| (r.segment, r.date)).collect();
        self.rows.lock().map(|mut rows| *rows = fresh).ok();
    }

    /// Delete every row
    pub fn clear(&self) {
        self.rows.lock().map(|mut rows| rows.clear()).ok();
    }

    /// Current date of a segment, read directly
    pub fn date_of(&self, segment: &str) -> Option<String> {
        self.rows
            .lock()
            .ok()
            .and_then(|rows| rows.get(segment).cloned())
    }

    /// Number of select calls served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of update calls served so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.rows.lock().map_err(|e| DateError::Persistence {
            op: "in_memory_row_store".to_string(),
            message: e.to_string(),
        })
    }
}

impl RowStore for InMemoryRowStore {
    fn select_by_segment(
        &self,
        _scope: &mut Scope,
        _queries: &DateQueries,
        segment: &str,
    ) -> Result<Option<BusinessDate>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let rows = self.lock()?;
        Ok(rows
            .get(segment)
            .map(|date| BusinessDate::new(segment, date.clone())))
    }

    fn select_all(&self, _scope: &mut Scope, _queries: &DateQueries) -> Result<Vec<BusinessDate>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let rows = self.lock()?;
        Ok(rows
            .iter()
            .map(|(segment, date)| BusinessDate::new(segment.clone(), date.clone()))
            .collect())
    }

    fn update_by_segment(
        &self,
        _scope: &mut Scope,
        _queries: &DateQueries,
        segment: &str,
        date: &str,
    ) -> Result<usize> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.lock()?;
        match rows.get_mut(segment) {
            Some(current) => {
                *current = date.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
