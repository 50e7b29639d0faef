#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use bizdate_core::{BusinessDateProvider, DateError, ExErrorKind, Scope};
use bizdate_store::ConnectionFactory;
use common::TestDb;

#[test]
fn test_cached_scope_over_sqlite() {
    let db = TestDb::with_three_segments();
    let mut provider = db.provider(true);
    let mut scope = Scope::new();

    let all = provider.get_all_date(&mut scope).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all.get("02"), Some("20110301"));

    let writer = db.factory.open().unwrap();
    writer
        .execute(
            "UPDATE business_date SET biz_date = '20110102' WHERE segment = '00'",
            [],
        )
        .unwrap();
    drop(writer);

    assert_eq!(provider.get_date(&mut scope).unwrap(), "20110101");
    provider.set_cache_enabled(false);
    assert_eq!(provider.get_date(&mut scope).unwrap(), "20110102");
}

#[test]
fn test_write_then_read_without_cache() {
    let db = TestDb::with_three_segments();
    let provider = db.provider(false);
    let mut scope = Scope::new();

    provider
        .set_date(&mut scope, Some("00"), Some("20501231"))
        .unwrap();

    assert_eq!(provider.get_date(&mut scope).unwrap(), "20501231");
    assert_eq!(db.stored_date("00").as_deref(), Some("20501231"));
}

#[test]
fn test_unknown_segment_not_found_both_modes() {
    let db = TestDb::with_three_segments();
    for cache_enabled in [true, false] {
        let provider = db.provider(cache_enabled);
        let mut scope = Scope::new();
        let expected = DateError::SegmentNotFound {
            segment: "unknown".to_string(),
        };

        assert_eq!(
            provider.get_date_by_segment(&mut scope, "unknown"),
            Err(expected.clone())
        );
        assert_eq!(
            provider.set_date(&mut scope, Some("unknown"), Some("20501231")),
            Err(expected)
        );
    }
}

#[test]
fn test_empty_table_not_registered() {
    let db = TestDb::new();
    for cache_enabled in [true, false] {
        let provider = db.provider(cache_enabled);
        assert_eq!(
            provider.get_all_date(&mut Scope::new()),
            Err(DateError::NotRegistered)
        );
    }
}

#[test]
fn test_missing_table_is_persistence_error() {
    let db = TestDb::with_three_segments();
    let mut provider = db.provider(false);
    provider.set_table_name("no_such_table");
    provider.initialize().unwrap();

    let err = provider.get_all_date(&mut Scope::new()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(err.to_string().contains("select_all"));
}

#[test]
fn test_register_segment_then_read() {
    let db = TestDb::with_three_segments();
    let provider = db.provider(false);
    let queries = provider.queries().unwrap().clone();
    let mut scope = Scope::new();

    db.row_store
        .register_segment(&mut scope, &queries, "03", "20110401")
        .unwrap();

    assert_eq!(
        provider.get_date_by_segment(&mut scope, "03").unwrap(),
        "20110401"
    );
}

#[test]
fn test_register_segment_rejects_duplicates_and_bad_dates() {
    let db = TestDb::with_three_segments();
    let provider = db.provider(false);
    let queries = provider.queries().unwrap().clone();
    let mut scope = Scope::new();

    let err = db
        .row_store
        .register_segment(&mut scope, &queries, "00", "20110401")
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);

    let err = db
        .row_store
        .register_segment(&mut scope, &queries, "05", "20110431")
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(db.stored_date("05"), None);

    let err = db
        .row_store
        .register_segment(&mut scope, &queries, "06", "00000101")
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(db.stored_date("06"), None);
}
