// Boundary logging of engine commands

use std::sync::Arc;

use bizdate_core::logging_facility::test_capture::init_test_capture;
use bizdate_core::model::BusinessDate;
use bizdate_core::overrides::NoOverrides;
use bizdate_core::row_store::InMemoryRowStore;
use bizdate_core::{BasicBusinessDateProvider, Scope, ValidationMemo};
use bizdate_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_ERR_MESSAGE, FIELD_SCOPE_ID,
};
use bizdate_core_types::ScopeId;
use bizdate_engine::commands::business_date::{get_all_date, get_date, set_date};
use bizdate_engine::commands::string_resource::get_string_resource;
use bizdate_store::{SqliteConnectionFactory, StringResourceLoader};

fn provider() -> BasicBusinessDateProvider {
    let store = Arc::new(InMemoryRowStore::with_rows([
        BusinessDate::new("00", "20110101"),
        BusinessDate::new("01", "20110201"),
    ]));
    let mut provider =
        BasicBusinessDateProvider::new(store, Arc::new(NoOverrides), Arc::new(ValidationMemo::new()));
    provider.set_table_name("business_date");
    provider.set_segment_column_name("segment");
    provider.set_date_column_name("biz_date");
    provider.set_default_segment("00");
    provider.initialize().unwrap();
    provider
}

fn scope(id: &str) -> Scope {
    Scope::with_id(ScopeId::from_string(id.to_string()))
}

#[test]
fn test_get_date_emits_start_and_end() {
    let capture = init_test_capture();
    let provider = provider();
    let mut scope = scope("cmd-log-get-date");

    let date = get_date(&provider, &mut scope, None).unwrap();
    assert_eq!(date, "20110101");

    let starts: Vec<_> = capture
        .events_for_op("get_date")
        .into_iter()
        .filter(|e| e.field(FIELD_SCOPE_ID) == Some("cmd-log-get-date"))
        .collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].event.as_deref(), Some(EVENT_START));

    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("get_date")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("date") == Some("20110101")
    });
    assert!(ends >= 1);
}

#[test]
fn test_failed_set_date_emits_end_error_with_code() {
    let capture = init_test_capture();
    let provider = provider();
    let mut scope = scope("cmd-log-set-date");

    let err = set_date(&provider, &mut scope, Some("cmd-log-missing"), Some("20300101")).unwrap_err();
    assert!(err.is_recoverable());

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("set_date")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_NOT_FOUND")
            && e.field(FIELD_ERR_MESSAGE) == Some("segment was not found. segment:cmd-log-missing.")
    });
    assert_eq!(errors, 1);
}

#[test]
fn test_get_all_date_end_reports_segment_count() {
    let capture = init_test_capture();
    let provider = provider();
    let mut scope = scope("cmd-log-get-all");

    get_all_date(&provider, &mut scope).unwrap();

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("get_all_date") && e.field(FIELD_SCOPE_ID) == Some("cmd-log-get-all")
    });
    assert_eq!(starts, 1);
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("get_all_date")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("segment_count") == Some("2")
    });
    assert!(ends >= 1);
}

#[test]
fn test_invalid_argument_logged_once_at_boundary() {
    let capture = init_test_capture();
    let provider = provider();
    let mut scope = scope("cmd-log-invalid");

    let err = set_date(&provider, &mut scope, Some("00"), Some("cmd-log-2050/1/1")).unwrap_err();
    assert!(err.is_invalid_argument());

    let errors = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_MESSAGE).map_or(false, |m| m.contains("cmd-log-2050/1/1"))
    });
    assert_eq!(errors, 1, "only the engine boundary logs the error");
}

#[test]
fn test_uninitialized_loader_emits_end_error() {
    let capture = init_test_capture();
    let loader = StringResourceLoader::new(Arc::new(SqliteConnectionFactory::new(
        "cmd-log-never-opened.db",
    )));
    let scope = scope("cmd-log-resource");

    let err = get_string_resource(&loader, &scope, "10001").unwrap_err();
    assert_eq!(err, bizdate_core::DateError::NotInitialized);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("get_string_resource")
            && e.event.as_deref() == Some(EVENT_START)
            && e.field(FIELD_SCOPE_ID) == Some("cmd-log-resource")
    });
    assert_eq!(starts, 1);

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("get_string_resource")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_NOT_INITIALIZED")
    });
    assert!(errors >= 1);
}
