//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between the
//! provider, the string resource loader and the persistence layer.

pub mod business_date;
pub mod migrate;
pub mod string_resource;
