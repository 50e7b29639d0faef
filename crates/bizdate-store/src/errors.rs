//! Error helpers for bizdate-store
//!
//! Every store failure surfaces as `DateError::Persistence` or `DateError::Io`
//! so callers of the `RowStore` seam see a single error type.

use bizdate_core::errors::DateError;

/// Result type alias using DateError
pub type Result<T> = std::result::Result<T, DateError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> DateError {
    persistence("sqlite", err)
}

/// Create a database error tagged with the failing operation
pub fn persistence(op: &str, err: rusqlite::Error) -> DateError {
    DateError::Persistence {
        op: op.to_string(),
        message: err.to_string(),
    }
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> DateError {
    DateError::Persistence {
        op: "migration".to_string(),
        message: format!("Migration {} failed: {}", migration_id, reason),
    }
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> DateError {
    DateError::Persistence {
        op: "migration_checksum".to_string(),
        message: format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    }
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> DateError {
    DateError::Io {
        op: operation.to_string(),
        message: err.to_string(),
    }
}
