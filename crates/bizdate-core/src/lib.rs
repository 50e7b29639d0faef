//! bizdate Core - business date resolution kernel
//!
//! This crate provides the domain types and the resolution logic for
//! business dates, including:
//! - `BusinessDate` rows and immutable `DateSnapshot`s of every segment
//! - `yyyyMMdd` calendar validation
//! - Unit-of-work `Scope` storage that bounds the lifetime of cached snapshots
//! - A process-wide `ValidationMemo` for override values
//! - The `OverrideSource` and `RowStore` seams
//! - `BasicBusinessDateProvider`, which resolves overrides, caches and rows

pub mod date_format;
pub mod errors;
pub mod logging_facility;
pub mod memo;
pub mod model;
pub mod overrides;
pub mod provider;
pub mod row_store;
pub mod scope;

// Re-export commonly used types
pub use errors::{ArgumentField, DateError, ExError, ExErrorKind, Result};
pub use memo::ValidationMemo;
pub use model::{BusinessDate, DateSnapshot};
pub use overrides::OverrideSource;
pub use provider::{BasicBusinessDateProvider, BusinessDateProvider, ProviderConfig};
pub use row_store::{DateQueries, RowStore};
pub use scope::Scope;
