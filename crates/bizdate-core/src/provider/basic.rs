//! Table-backed business date provider
//!
//! ## Resolution order for one segment
//!
//! 1. Override: the value configured under `BasicBusinessDateProvider.<segment>`
//!    wins if present and non-empty. It must be a valid `yyyyMMdd` date or the
//!    read fails; it never falls back to the table.
//! 2. Cache enabled: the all-segments snapshot stored in the scope, loaded from
//!    the row store on first access within the scope.
//! 3. Cache disabled: a direct single-row read.
//!
//! ## Writes
//!
//! `set_date` goes straight to the row store and leaves the scope's snapshot
//! untouched. A unit of work keeps seeing the dates it started with (e.g.
//! across a midnight roll-over job); the write becomes visible to the next
//! scope.

use std::sync::Arc;

use crate::date_format;
use crate::errors::{ArgumentField, DateError, Result};
use crate::memo::ValidationMemo;
use crate::model::DateSnapshot;
use crate::overrides::{override_key, OverrideSource};
use crate::provider::config::ProviderConfig;
use crate::provider::queries;
use crate::row_store::{DateQueries, RowStore};
use crate::scope::Scope;

/// Namespace of override keys
pub const PROVIDER_TYPE_NAME: &str = "BasicBusinessDateProvider";

/// Scope key of the cached all-segments snapshot
pub const CACHE_KEY: &str = "BUSINESS_DATE";

/// Caller-facing business date surface
pub trait BusinessDateProvider: Send + Sync {
    /// Date of the default segment
    fn get_date(&self, scope: &mut Scope) -> Result<String>;

    /// Date of `segment`
    fn get_date_by_segment(&self, scope: &mut Scope, segment: &str) -> Result<String>;

    /// Dates of every segment registered in the table
    fn get_all_date(&self, scope: &mut Scope) -> Result<DateSnapshot>;

    /// Replace the stored date of an existing segment
    ///
    /// `None` stands for an argument that was not supplied at all.
    fn set_date(&self, scope: &mut Scope, segment: Option<&str>, date: Option<&str>)
        -> Result<()>;
}

/// Provider reading the business date table through a `RowStore`
pub struct BasicBusinessDateProvider {
    config: ProviderConfig,
    queries: Option<DateQueries>,
    row_store: Arc<dyn RowStore>,
    overrides: Arc<dyn OverrideSource>,
    memo: Arc<ValidationMemo>,
}

impl BasicBusinessDateProvider {
    /// Create an uninitialized provider with default settings
    pub fn new(
        row_store: Arc<dyn RowStore>,
        overrides: Arc<dyn OverrideSource>,
        memo: Arc<ValidationMemo>,
    ) -> Self {
        Self {
            config: ProviderConfig::default(),
            queries: None,
            row_store,
            overrides,
            memo,
        }
    }

    /// Replace every setting at once
    ///
    /// Like the individual setters this does not recompile statements.
    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn set_table_name(&mut self, table_name: impl Into<String>) {
        self.config.table_name = Some(table_name.into());
    }

    pub fn set_segment_column_name(&mut self, column: impl Into<String>) {
        self.config.segment_column_name = Some(column.into());
    }

    pub fn set_date_column_name(&mut self, column: impl Into<String>) {
        self.config.date_column_name = Some(column.into());
    }

    pub fn set_default_segment(&mut self, segment: impl Into<String>) {
        self.config.default_segment = Some(segment.into());
    }

    /// Enable or disable the scoped cache; takes effect on the next call
    pub fn set_cache_enabled(&mut self, enabled: bool) {
        self.config.cache_enabled = enabled;
    }

    pub fn set_transaction_name(&mut self, name: impl Into<String>) {
        self.config.transaction_name = name.into();
    }

    pub fn is_cache_enabled(&self) -> bool {
        self.config.cache_enabled
    }

    /// Compile the statements from the current settings
    ///
    /// Settings changed afterwards only take effect after calling this again.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if table or column names are missing or
    /// are not plain identifiers.
    pub fn initialize(&mut self) -> Result<()> {
        let compiled = queries::compile(&self.config)?;
        tracing::debug!(
            table = %compiled.table_name,
            transaction_name = %compiled.transaction_name,
            cache_enabled = self.config.cache_enabled,
            "business date provider initialized"
        );
        self.queries = Some(compiled);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.queries.is_some()
    }

    /// Statements compiled by the last `initialize`
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` before the first successful `initialize`.
    pub fn queries(&self) -> Result<&DateQueries> {
        self.queries.as_ref().ok_or(DateError::NotInitialized)
    }

    /// Override key consulted for `segment`
    pub fn override_key(segment: &str) -> String {
        override_key(PROVIDER_TYPE_NAME, segment)
    }

    /// Resolve the override of one segment, validating it at most once
    fn override_date(&self, segment: &str) -> Result<Option<String>> {
        let date = match self.overrides.get(&Self::override_key(segment)) {
            Some(date) if !date.is_empty() => date,
            _ => return Ok(None),
        };

        if self.memo.contains(&date) {
            return Ok(Some(date));
        }
        if !date_format::is_valid(&date) {
            return Err(DateError::InvalidOverride {
                date,
                segment: segment.to_string(),
            });
        }
        self.memo.insert(&date);
        tracing::debug!(segment, date = %date, "business date override validated");
        Ok(Some(date))
    }

    /// Read every row and overlay overrides onto the segments found
    ///
    /// Overrides whose segment has no row are not added.
    fn load_all_dates(&self, scope: &mut Scope, queries: &DateQueries) -> Result<DateSnapshot> {
        let rows = self.row_store.select_all(scope, queries)?;
        if rows.is_empty() {
            return Err(DateError::NotRegistered);
        }

        rows.into_iter()
            .map(|row| {
                let date = match self.override_date(&row.segment)? {
                    Some(date) => date,
                    None => row.date,
                };
                Ok((row.segment, date))
            })
            .collect()
    }

    /// Run `f` against the scope's snapshot, loading it on first access
    fn with_cached_dates<T>(
        &self,
        scope: &mut Scope,
        queries: &DateQueries,
        f: impl FnOnce(&DateSnapshot) -> T,
    ) -> Result<T> {
        if let Some(snapshot) = scope.get::<DateSnapshot>(CACHE_KEY) {
            return Ok(f(snapshot));
        }

        let snapshot = self.load_all_dates(scope, queries)?;
        tracing::debug!(
            scope_id = %scope.id(),
            segment_count = snapshot.len(),
            "business date cache populated"
        );
        let result = f(&snapshot);
        scope.set(CACHE_KEY, snapshot);
        Ok(result)
    }

    fn default_segment(&self) -> Result<&str> {
        self.config
            .default_segment
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DateError::InvalidConfiguration {
                reason: "default_segment is not configured".to_string(),
            })
    }
}

impl BusinessDateProvider for BasicBusinessDateProvider {
    fn get_date(&self, scope: &mut Scope) -> Result<String> {
        self.queries()?;
        let segment = self.default_segment()?;
        self.get_date_by_segment(scope, segment)
    }

    fn get_date_by_segment(&self, scope: &mut Scope, segment: &str) -> Result<String> {
        let queries = self.queries()?;

        if let Some(date) = self.override_date(segment)? {
            return Ok(date);
        }

        let not_found = || DateError::SegmentNotFound {
            segment: segment.to_string(),
        };

        if self.config.cache_enabled {
            return self
                .with_cached_dates(scope, queries, |snapshot| {
                    snapshot.get(segment).map(str::to_string)
                })?
                .ok_or_else(not_found);
        }

        self.row_store
            .select_by_segment(scope, queries, segment)?
            .map(|row| row.date)
            .ok_or_else(not_found)
    }

    fn get_all_date(&self, scope: &mut Scope) -> Result<DateSnapshot> {
        let queries = self.queries()?;
        if self.config.cache_enabled {
            return self.with_cached_dates(scope, queries, DateSnapshot::clone);
        }
        self.load_all_dates(scope, queries)
    }

    fn set_date(
        &self,
        scope: &mut Scope,
        segment: Option<&str>,
        date: Option<&str>,
    ) -> Result<()> {
        let segment = segment.ok_or(DateError::MissingArgument {
            field: ArgumentField::Segment,
        })?;
        let date = date.ok_or(DateError::MissingArgument {
            field: ArgumentField::Date,
        })?;
        if segment.is_empty() {
            return Err(DateError::EmptyArgument {
                field: ArgumentField::Segment,
            });
        }
        if date.is_empty() {
            return Err(DateError::EmptyArgument {
                field: ArgumentField::Date,
            });
        }
        if !date_format::is_valid(date) {
            return Err(DateError::MalformedDate {
                value: date.to_string(),
            });
        }

        let queries = self.queries()?;
        let updated = self
            .row_store
            .update_by_segment(scope, queries, segment, date)?;
        if updated == 0 {
            return Err(DateError::SegmentNotFound {
                segment: segment.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BusinessDate;
    use crate::overrides::MapOverrideSource;
    use crate::row_store::InMemoryRowStore;

    fn provider(store: Arc<InMemoryRowStore>) -> BasicBusinessDateProvider {
        let mut provider = BasicBusinessDateProvider::new(
            store,
            Arc::new(MapOverrideSource::new()),
            Arc::new(ValidationMemo::new()),
        );
        provider.set_table_name("BUSINESS_DATE");
        provider.set_segment_column_name("SEGMENT");
        provider.set_date_column_name("BIZ_DATE");
        provider.set_default_segment("00");
        provider
    }

    #[test]
    fn test_uninitialized_provider_refuses_reads() {
        let store = Arc::new(InMemoryRowStore::with_rows([BusinessDate::new(
            "00", "20110101",
        )]));
        let provider = provider(store);
        let mut scope = Scope::new();

        assert_eq!(provider.get_date(&mut scope), Err(DateError::NotInitialized));
        assert_eq!(
            provider.get_all_date(&mut scope),
            Err(DateError::NotInitialized)
        );
    }

    #[test]
    fn test_setters_need_reinitialize() {
        let store = Arc::new(InMemoryRowStore::new());
        let mut provider = provider(store);
        provider.initialize().unwrap();

        provider.set_table_name("OTHER_TABLE");
        assert_eq!(provider.queries().unwrap().table_name, "BUSINESS_DATE");

        provider.initialize().unwrap();
        assert_eq!(provider.queries().unwrap().table_name, "OTHER_TABLE");
    }

    #[test]
    fn test_cache_stored_under_well_known_key() {
        let store = Arc::new(InMemoryRowStore::with_rows([BusinessDate::new(
            "00", "20110101",
        )]));
        let mut provider = provider(store);
        provider.initialize().unwrap();
        let mut scope = Scope::new();

        provider.get_date(&mut scope).unwrap();

        let cached = scope.get::<DateSnapshot>(CACHE_KEY).unwrap();
        assert_eq!(cached.get("00"), Some("20110101"));
    }

    #[test]
    fn test_missing_default_segment() {
        let store = Arc::new(InMemoryRowStore::new());
        let mut provider = provider(store);
        provider.config.default_segment = None;
        provider.initialize().unwrap();

        let err = provider.get_date(&mut Scope::new()).unwrap_err();
        assert!(matches!(err, DateError::InvalidConfiguration { .. }));
    }
}
