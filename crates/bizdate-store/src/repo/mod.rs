//! Repository layer for the business date and string resource tables

pub mod registration;
pub mod sqlite_row_store;
pub mod string_resource;

pub use registration::insert_segment;
pub use sqlite_row_store::SqliteRowStore;
pub use string_resource::{StringResource, StringResourceConfig, StringResourceLoader};
