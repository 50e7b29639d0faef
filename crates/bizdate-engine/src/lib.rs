//! bizdate Engine - Orchestration layer
//!
//! Loads settings, wires the SQLite row store, override sources and the
//! provider together, and exposes command functions that own boundary
//! logging.

pub mod commands;
pub mod overrides;
pub mod runtime;
pub mod settings;

pub use overrides::SettingsOverrideSource;
pub use runtime::Runtime;
pub use settings::{Settings, SettingsLoader};
