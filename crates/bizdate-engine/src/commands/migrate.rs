//! Schema migration command

use bizdate_core::{log_op_end, log_op_error, log_op_start, Result};
use bizdate_store::migrations;
use rusqlite::Connection;

/// Apply pending migrations and return the ids of all applied migrations
///
/// ## Errors
///
/// - `Persistence`: A migration failed or its checksum no longer matches
pub fn migrate(conn: &mut Connection) -> Result<Vec<String>> {
    log_op_start!("migrate");
    let start = std::time::Instant::now();

    let applied = migrations::apply_migrations(conn)
        .and_then(|()| migrations::applied_migrations(conn))
        .map_err(|e| {
            log_op_error!(
                "migrate",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "migrate",
        duration_ms = start.elapsed().as_millis() as u64,
        migrations = applied.len()
    );

    Ok(applied)
}
