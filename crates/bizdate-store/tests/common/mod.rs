use std::sync::Arc;

use bizdate_core::overrides::NoOverrides;
use bizdate_core::{BasicBusinessDateProvider, ValidationMemo};
use bizdate_store::migrations::apply_migrations;
use bizdate_store::{
    ConnectionFactory, SqliteConnectionFactory, SqliteRowStore, StringResourceLoader,
};
use tempfile::TempDir;

/// File-backed database with the schema applied
pub struct TestDb {
    // Keeps the directory alive for the duration of the test
    _dir: TempDir,
    pub factory: Arc<SqliteConnectionFactory>,
    pub row_store: Arc<SqliteRowStore>,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(SqliteConnectionFactory::new(dir.path().join("bizdate.db")));
        let mut conn = factory.open().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.close().unwrap();

        let row_store = Arc::new(SqliteRowStore::new(factory.clone()));
        Self {
            _dir: dir,
            factory,
            row_store,
        }
    }

    /// Database holding segments 00, 01 and 02
    #[allow(dead_code)]
    pub fn with_three_segments() -> Self {
        let db = Self::new();
        db.insert("00", "20110101");
        db.insert("01", "20110201");
        db.insert("02", "20110301");
        db
    }

    pub fn insert(&self, segment: &str, date: &str) {
        let conn = self.factory.open().unwrap();
        conn.execute(
            "INSERT INTO business_date (segment, biz_date) VALUES (?1, ?2)",
            [segment, date],
        )
        .unwrap();
    }

    /// Date of `segment` as seen by a fresh connection
    #[allow(dead_code)]
    pub fn stored_date(&self, segment: &str) -> Option<String> {
        let conn = self.factory.open().unwrap();
        conn.query_row(
            "SELECT biz_date FROM business_date WHERE segment = ?1",
            [segment],
            |row| row.get(0),
        )
        .ok()
    }

    /// Initialized provider over this database with default segment 00
    pub fn provider(&self, cache_enabled: bool) -> BasicBusinessDateProvider {
        let mut provider = BasicBusinessDateProvider::new(
            self.row_store.clone(),
            Arc::new(NoOverrides),
            Arc::new(ValidationMemo::new()),
        );
        provider.set_table_name("business_date");
        provider.set_segment_column_name("segment");
        provider.set_date_column_name("biz_date");
        provider.set_default_segment("00");
        provider.set_cache_enabled(cache_enabled);
        provider.initialize().unwrap();
        provider
    }

    /// Insert one language value of a string resource
    #[allow(dead_code)]
    pub fn insert_resource(&self, id: &str, lang: &str, value: &str) {
        let conn = self.factory.open().unwrap();
        conn.execute(
            "INSERT INTO string_resource (id, lang, value) VALUES (?1, ?2, ?3)",
            [id, lang, value],
        )
        .unwrap();
    }

    /// Initialized loader over the migrated string resource table
    #[allow(dead_code)]
    pub fn loader(&self) -> StringResourceLoader {
        let mut loader = StringResourceLoader::new(self.factory.clone());
        loader.set_table_name("string_resource");
        loader.set_id_column_name("id");
        loader.set_lang_column_name("lang");
        loader.set_value_column_name("value");
        loader.initialize().unwrap();
        loader
    }
}
