//! Canonical logging macros
//!
//! Every event carries `component` (the calling module), `op` and `event`.
//! `event` is one of `bizdate_core_types::schema::{EVENT_START, EVENT_END,
//! EVENT_END_ERROR}`:
//!
//! | event       | level | extra fields                                       |
//! |-------------|-------|----------------------------------------------------|
//! | `start`     | INFO  | caller fields                                      |
//! | `end`       | INFO  | `duration_ms`, caller fields                       |
//! | `end_error` | ERROR | `duration_ms`, `err_kind`, `err_code`, `err_message` |
//!
//! `err_message` is the `Display` text of the logged `DateError`.
//!
//! Callers must depend on `bizdate-core-types` and `tracing`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use bizdate_core::log_op_start;
/// log_op_start!("get_date");
/// log_op_start!("get_date", segment = "00");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bizdate_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bizdate_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use bizdate_core::log_op_end;
/// log_op_end!("get_date", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bizdate_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bizdate_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into an `ExError` to obtain its kind and code.
///
/// # Example
///
/// ```
/// # use bizdate_core::{log_op_error, errors::DateError};
/// let err = DateError::NotRegistered;
/// log_op_error!("get_all_date", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = bizdate_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = bizdate_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message(),
            $($field)*
        );
    }};
}
