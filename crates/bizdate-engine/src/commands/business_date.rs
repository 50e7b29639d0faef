//! Business date command handlers with boundary logging.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for business date operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

use bizdate_core::{
    log_op_end, log_op_error, log_op_start, BusinessDateProvider, DateQueries, DateSnapshot,
    Result, Scope,
};
use bizdate_store::SqliteRowStore;

/// Get the date of `segment`, or of the default segment when `None`
///
/// ## Errors
///
/// - `SegmentNotFound`: No row and no override for the segment
/// - `NotRegistered`: Table is empty (cache enabled)
/// - `InvalidOverride`: Configured override is not a calendar date
/// - `InvalidConfiguration`: No segment given and no default configured
pub fn get_date(
    provider: &dyn BusinessDateProvider,
    scope: &mut Scope,
    segment: Option<&str>,
) -> Result<String> {
    log_op_start!("get_date", scope_id = %scope.id(), segment = ?segment);
    let start = std::time::Instant::now();

    let result = match segment {
        Some(segment) => provider.get_date_by_segment(scope, segment),
        None => provider.get_date(scope),
    }
    .map_err(|e| {
        log_op_error!(
            "get_date",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "get_date",
        duration_ms = start.elapsed().as_millis() as u64,
        date = %result
    );

    Ok(result)
}

/// Get the dates of every registered segment
///
/// ## Errors
///
/// - `NotRegistered`: Table is empty
/// - `InvalidOverride`: An override of a registered segment is invalid
pub fn get_all_date(provider: &dyn BusinessDateProvider, scope: &mut Scope) -> Result<DateSnapshot> {
    log_op_start!("get_all_date", scope_id = %scope.id());
    let start = std::time::Instant::now();

    let snapshot = provider.get_all_date(scope).map_err(|e| {
        log_op_error!(
            "get_all_date",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "get_all_date",
        duration_ms = start.elapsed().as_millis() as u64,
        segment_count = snapshot.len()
    );

    Ok(snapshot)
}

/// Replace the stored date of an existing segment
///
/// ## Errors
///
/// - `MissingArgument` / `EmptyArgument` / `MalformedDate`: Invalid input
/// - `SegmentNotFound`: No row for the segment
/// - `Persistence`: Database error
pub fn set_date(
    provider: &dyn BusinessDateProvider,
    scope: &mut Scope,
    segment: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    log_op_start!("set_date", scope_id = %scope.id(), segment = ?segment, date = ?date);
    let start = std::time::Instant::now();

    provider.set_date(scope, segment, date).map_err(|e| {
        log_op_error!(
            "set_date",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!("set_date", duration_ms = start.elapsed().as_millis() as u64);

    Ok(())
}

/// Add a new segment row
///
/// ## Errors
///
/// - `EmptyArgument` / `MalformedDate`: Invalid input
/// - `Persistence`: Segment already exists or database error
pub fn register_segment(
    row_store: &SqliteRowStore,
    queries: &DateQueries,
    scope: &mut Scope,
    segment: &str,
    date: &str,
) -> Result<()> {
    log_op_start!("register_segment", scope_id = %scope.id(), segment = segment, date = date);
    let start = std::time::Instant::now();

    row_store
        .register_segment(scope, queries, segment, date)
        .map_err(|e| {
            log_op_error!(
                "register_segment",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "register_segment",
        duration_ms = start.elapsed().as_millis() as u64
    );

    Ok(())
}
