//! Override sources
//!
//! An override source is a process-wide key/value store consulted by the
//! provider before the row store. The provider always asks for the key
//! `"<ProviderTypeName>.<segment>"` (see [`override_key`]), e.g.
//! `BasicBusinessDateProvider.00`, and asks again on every read: a source may
//! be reloaded at any time and the next read must observe the new value.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Separator between the provider type name and the segment
pub const KEY_SEPARATOR: char = '.';

/// Build the override key for a segment
pub fn override_key(type_name: &str, segment: &str) -> String {
    format!("{}{}{}", type_name, KEY_SEPARATOR, segment)
}

/// Read-only view of process configuration used for overrides
pub trait OverrideSource: Send + Sync {
    /// Get the raw value for `key`, if configured
    fn get(&self, key: &str) -> Option<String>;
}

impl<T: OverrideSource + ?Sized> OverrideSource for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<T: OverrideSource + ?Sized> OverrideSource for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Source with no overrides at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverrides;

impl OverrideSource for NoOverrides {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

/// In-memory source that can be edited or reloaded while in use
#[derive(Debug, Default)]
pub struct MapOverrideSource {
    values: RwLock<HashMap<String, String>>,
}

impl MapOverrideSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from `(key, value)` pairs
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Set or replace one value
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .map(|mut values| {
                values.insert(key.into(), value.into());
            })
            .ok();
    }

    /// Remove one value
    pub fn remove(&self, key: &str) {
        self.values
            .write()
            .map(|mut values| {
                values.remove(key);
            })
            .ok();
    }

    /// Replace every value at once
    pub fn reload(&self, values: HashMap<String, String>) {
        self.values.write().map(|mut current| *current = values).ok();
    }
}

impl OverrideSource for MapOverrideSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }
}

/// Source backed by the process environment
///
/// The key `BasicBusinessDateProvider.00` is read from the variable
/// `BASICBUSINESSDATEPROVIDER_00`: ASCII upper-cased, with every character
/// that is not alphanumeric replaced by `_`. The environment is read on every
/// call.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvOverrideSource;

impl EnvOverrideSource {
    /// Environment variable name consulted for `key`
    pub fn variable_name(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl OverrideSource for EnvOverrideSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(Self::variable_name(key)).ok()
    }
}

/// Sources consulted in order; the first non-empty value wins
#[derive(Default)]
pub struct ChainedOverrideSource {
    sources: Vec<Box<dyn OverrideSource>>,
}

impl ChainedOverrideSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower-priority source
    pub fn with_source(mut self, source: impl OverrideSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl OverrideSource for ChainedOverrideSource {
    fn get(&self, key: &str) -> Option<String> {
        self.sources
            .iter()
            .filter_map(|source| source.get(key))
            .find(|value| !value.is_empty())
    }
}
