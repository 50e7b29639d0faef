use std::sync::Arc;

use bizdate_core::model::BusinessDate;
use bizdate_core::overrides::MapOverrideSource;
use bizdate_core::row_store::InMemoryRowStore;
use bizdate_core::{BasicBusinessDateProvider, ValidationMemo};

/// Shared collaborators of a provider under test
pub struct Fixture {
    pub store: Arc<InMemoryRowStore>,
    pub overrides: Arc<MapOverrideSource>,
    pub memo: Arc<ValidationMemo>,
}

impl Fixture {
    /// Fixture holding segments 00, 01 and 02
    #[allow(dead_code)]
    pub fn with_three_segments() -> Self {
        Self::with_rows([
            BusinessDate::new("00", "20110101"),
            BusinessDate::new("01", "20110201"),
            BusinessDate::new("02", "20110301"),
        ])
    }

    pub fn with_rows(rows: impl IntoIterator<Item = BusinessDate>) -> Self {
        Self {
            store: Arc::new(InMemoryRowStore::with_rows(rows)),
            overrides: Arc::new(MapOverrideSource::new()),
            memo: Arc::new(ValidationMemo::new()),
        }
    }

    /// Initialized provider with default segment 00
    pub fn provider(&self, cache_enabled: bool) -> BasicBusinessDateProvider {
        let mut provider = BasicBusinessDateProvider::new(
            self.store.clone(),
            self.overrides.clone(),
            self.memo.clone(),
        );
        provider.set_table_name("BUSINESS_DATE");
        provider.set_segment_column_name("SEGMENT");
        provider.set_date_column_name("BIZ_DATE");
        provider.set_default_segment("00");
        provider.set_cache_enabled(cache_enabled);
        provider.initialize().unwrap();
        provider
    }

    /// Configure an override for `segment`
    #[allow(dead_code)]
    pub fn set_override(&self, segment: &str, date: &str) {
        self.overrides
            .set(BasicBusinessDateProvider::override_key(segment), date);
    }
}
