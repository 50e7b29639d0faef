//! Memo of override values already confirmed to be valid dates
//!
//! Shared by every provider and unit of work that is handed the same
//! `Arc<ValidationMemo>`. Entries are only ever added; the value space is the
//! handful of dates actually configured as overrides.

use std::collections::HashSet;
use std::sync::RwLock;

/// Concurrency-safe set of validated `yyyyMMdd` strings
///
/// Two units of work validating the same value at once both insert it; the
/// result is identical, so the race only costs a redundant check. A poisoned
/// lock degrades to "not memoized", which forces re-validation.
#[derive(Debug, Default)]
pub struct ValidationMemo {
    validated: RwLock<HashSet<String>>,
}

impl ValidationMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `date` has already passed validation
    pub fn contains(&self, date: &str) -> bool {
        self.validated
            .read()
            .map(|set| set.contains(date))
            .unwrap_or(false)
    }

    /// Record that `date` passed validation
    pub fn insert(&self, date: &str) {
        self.validated
            .write()
            .map(|mut set| {
                set.insert(date.to_string());
            })
            .ok();
    }

    /// Number of memoized values
    pub fn len(&self) -> usize {
        self.validated.read().map(|set| set.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every memoized value (test isolation)
    pub fn clear(&self) {
        self.validated.write().map(|mut set| set.clear()).ok();
    }
}
