//! Unit-of-work scope storage
//!
//! A `Scope` is created by the surrounding pipeline for one logical unit of
//! work (one inbound request, one batch step) and dropped when that unit
//! ends. Components keep per-unit state in it under well-known keys: the
//! provider caches its all-segments snapshot here, and the store registers
//! the unit's database connection here.
//!
//! A scope is owned by exactly one unit of work and is not shared between
//! threads, so it carries no locking.

use bizdate_core_types::ScopeId;
use std::any::Any;
use std::collections::HashMap;

/// Keyed, typed storage bounded by one unit of work
pub struct Scope {
    id: ScopeId,
    values: HashMap<String, Box<dyn Any>>,
}

impl Scope {
    /// Create an empty scope with a fresh id
    pub fn new() -> Self {
        Self::with_id(ScopeId::new())
    }

    /// Create an empty scope with the given id
    pub fn with_id(id: ScopeId) -> Self {
        Self {
            id,
            values: HashMap::new(),
        }
    }

    pub fn id(&self) -> &ScopeId {
        &self.id
    }

    /// Get the value stored under `key`
    ///
    /// Returns `None` if the key is absent or holds a value of another type.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Get a mutable reference to the value stored under `key`
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Store `value` under `key`, replacing whatever was there
    pub fn set<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Remove and return the value stored under `key`
    ///
    /// A value of another type is left in place and `None` is returned.
    pub fn remove<T: Any>(&mut self, key: &str) -> Option<T> {
        if self.get::<T>(key).is_none() {
            return None;
        }
        self.values
            .remove(key)
            .and_then(|v| v.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Drop every stored value
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("keys", &keys)
            .finish()
    }
}
