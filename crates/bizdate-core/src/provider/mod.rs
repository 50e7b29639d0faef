//! Business date providers
//!
//! - `config`: settings accepted by `BasicBusinessDateProvider`
//! - `queries`: compilation of those settings into `DateQueries`
//! - `basic`: the `BusinessDateProvider` surface and its table-backed
//!   implementation

pub mod basic;
pub mod config;
pub mod queries;

pub use basic::{BasicBusinessDateProvider, BusinessDateProvider, CACHE_KEY, PROVIDER_TYPE_NAME};
pub use config::{ProviderConfig, DEFAULT_TRANSACTION_NAME};
