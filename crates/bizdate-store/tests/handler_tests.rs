#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use bizdate_core::{BusinessDateProvider, DateError, Scope};
use bizdate_store::connection::{self, ConnectionFactory};
use bizdate_store::DbConnectionHandler;
use common::TestDb;

fn handler(db: &TestDb) -> DbConnectionHandler {
    let factory: Arc<dyn ConnectionFactory> = db.factory.clone();
    DbConnectionHandler::new(factory)
}

#[test]
fn test_successful_body_commits() {
    let db = TestDb::with_three_segments();
    let provider = db.provider(false);
    let mut scope = Scope::new();

    handler(&db)
        .handle(&mut scope, |scope| {
            provider.set_date(scope, Some("01"), Some("20501231"))
        })
        .unwrap();

    assert_eq!(db.stored_date("01").as_deref(), Some("20501231"));
    assert!(scope.is_empty(), "connection must be removed from the scope");
}

#[test]
fn test_failed_body_rolls_back() {
    let db = TestDb::with_three_segments();
    let provider = db.provider(false);
    let mut scope = Scope::new();

    let result: Result<(), DateError> = handler(&db).handle(&mut scope, |scope| {
        provider.set_date(scope, Some("01"), Some("20501231"))?;
        provider.set_date(scope, Some("unknown"), Some("20501231"))
    });

    assert_eq!(
        result,
        Err(DateError::SegmentNotFound {
            segment: "unknown".to_string()
        })
    );
    assert_eq!(db.stored_date("01").as_deref(), Some("20110201"));
    assert!(scope.is_empty());
}

#[test]
fn test_reads_inside_unit_of_work_see_its_own_writes() {
    let db = TestDb::with_three_segments();
    let provider = db.provider(false);
    let mut scope = Scope::new();

    let seen = handler(&db)
        .handle(&mut scope, |scope| {
            provider.set_date(scope, Some("00"), Some("20300101"))?;
            let inside = provider.get_date(scope)?;
            // not yet visible to other connections
            let outside = db.stored_date("00");
            Ok((inside, outside))
        })
        .unwrap();

    assert_eq!(seen.0, "20300101");
    assert_eq!(seen.1.as_deref(), Some("20110101"));
    assert_eq!(db.stored_date("00").as_deref(), Some("20300101"));
}

#[test]
fn test_cached_unit_of_work_keeps_snapshot_after_its_write() {
    let db = TestDb::with_three_segments();
    let provider = db.provider(true);
    let mut scope = Scope::new();

    let dates = handler(&db)
        .handle(&mut scope, |scope| {
            let before = provider.get_date(scope)?;
            provider.set_date(scope, Some("00"), Some("20300101"))?;
            let after = provider.get_date(scope)?;
            Ok((before, after))
        })
        .unwrap();

    assert_eq!(dates, ("20110101".to_string(), "20110101".to_string()));
    assert_eq!(
        provider.get_date(&mut Scope::new()).unwrap(),
        "20300101"
    );
}

#[test]
fn test_before_twice_reports_connection_in_use() {
    let db = TestDb::with_three_segments();
    let handler = handler(&db);
    let mut scope = Scope::new();

    handler.before(&mut scope).unwrap();
    let err = handler.before(&mut scope).unwrap_err();
    assert_eq!(
        err.to_string(),
        "database connection name is already used. connection name=[transaction]"
    );

    handler.after(&mut scope, false).unwrap();
    assert!(connection::scoped_connection(&scope, "transaction").is_none());
}

#[test]
fn test_nested_handle_with_same_name_fails_without_touching_outer() {
    let db = TestDb::with_three_segments();
    let handler = handler(&db);
    let provider = db.provider(false);
    let mut scope = Scope::new();

    handler
        .handle(&mut scope, |scope| {
            provider.set_date(scope, Some("02"), Some("20300301"))?;
            let nested = handler.handle(scope, |_| Ok(()));
            assert!(matches!(nested, Err(DateError::ConnectionInUse { .. })));
            Ok(())
        })
        .unwrap();

    assert_eq!(db.stored_date("02").as_deref(), Some("20300301"));
}

#[test]
fn test_custom_transaction_name_is_joined() {
    let db = TestDb::with_three_segments();
    let mut provider = db.provider(false);
    provider.set_transaction_name("batch");
    provider.initialize().unwrap();
    let handler = handler(&db).with_name("batch");
    let mut scope = Scope::new();

    handler
        .handle(&mut scope, |scope| {
            assert!(connection::scoped_connection(scope, "batch").is_some());
            provider.set_date(scope, Some("00"), Some("20300101"))
        })
        .unwrap();

    assert_eq!(handler.name(), "batch");
    assert_eq!(db.stored_date("00").as_deref(), Some("20300101"));
}

#[test]
fn test_after_without_connection_is_noop() {
    let db = TestDb::new();
    let mut scope = Scope::new();
    assert!(handler(&db).after(&mut scope, true).is_ok());
}

/// Ends the unit of work's transaction behind the handler's back
fn commit_out_of_band(scope: &Scope) {
    connection::scoped_connection(scope, "transaction")
        .unwrap()
        .connection()
        .execute_batch("COMMIT")
        .unwrap();
}

#[test]
fn test_commit_failure_after_successful_body_is_returned() {
    let db = TestDb::with_three_segments();
    let mut scope = Scope::new();

    let result = handler(&db).handle(&mut scope, |scope| {
        commit_out_of_band(scope);
        Ok("done")
    });

    match result {
        Err(DateError::Persistence { op, .. }) => assert_eq!(op, "commit"),
        other => panic!("expected commit failure, got {:?}", other),
    }
    assert!(scope.is_empty(), "connection must be removed even when commit fails");
}

#[test]
fn test_cleanup_failure_after_failed_body_keeps_body_error() {
    let db = TestDb::with_three_segments();
    let mut scope = Scope::new();

    let result: Result<(), DateError> = handler(&db).handle(&mut scope, |scope| {
        commit_out_of_band(scope);
        Err(DateError::NotRegistered)
    });

    assert_eq!(result, Err(DateError::NotRegistered));
    assert!(scope.is_empty());
}
