//! Business date domain model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the business date table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDate {
    /// Segment code selecting the date stream (e.g. `"00"`)
    pub segment: String,
    /// Date in `yyyyMMdd` form
    pub date: String,
}

impl BusinessDate {
    pub fn new(segment: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            date: date.into(),
        }
    }
}

/// Resolved date of every known segment at one point in time
///
/// Built fresh on every uncached read (or once per scope when caching is
/// enabled) and never mutated afterwards: the type exposes no way to change
/// its contents, so handing a copy to a caller cannot leak back into the
/// scoped cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateSnapshot {
    dates: BTreeMap<String, String>,
}

impl DateSnapshot {
    /// Get the date of a segment
    pub fn get(&self, segment: &str) -> Option<&str> {
        self.dates.get(segment).map(String::as_str)
    }

    pub fn contains_segment(&self, segment: &str) -> bool {
        self.dates.contains_key(segment)
    }

    /// Number of segments in the snapshot
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterate `(segment, date)` pairs in segment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dates.iter().map(|(s, d)| (s.as_str(), d.as_str()))
    }

    /// Borrow the underlying mapping
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.dates
    }

    /// Take ownership of the underlying mapping
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.dates
    }
}

impl FromIterator<(String, String)> for DateSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<BusinessDate> for DateSnapshot {
    fn from_iter<I: IntoIterator<Item = BusinessDate>>(iter: I) -> Self {
        iter.into_iter().map(|row| (row.segment, row.date)).collect()
    }
}
