//! The key-value store preferences are read from and written to.

use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

use crate::PrefsError;

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl PrefValue {
    fn kind(&self) -> &'static str {
        match self {
            PrefValue::Bool(_) => "bool",
            PrefValue::Int(_) => "integer",
            PrefValue::String(_) => "string",
        }
    }
}

/// String-keyed preference storage supplied by the host.
///
/// Implementors provide raw access with [`value`](PrefStore::value),
/// [`put`](PrefStore::put) and [`remove`](PrefStore::remove); the typed
/// accessors are derived from those. Reads never fail: an absent key, or a
/// value of the wrong type, yields the caller's default.
pub trait PrefStore {
    /// Raw value stored under `key`.
    fn value(&self, key: &str) -> Option<&PrefValue>;

    /// Stores `value` under `key`, replacing whatever was there.
    fn put(&mut self, key: &str, value: PrefValue) -> Result<(), PrefsError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), PrefsError>;

    fn has_key(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.value(key) {
            Some(PrefValue::Bool(value)) => *value,
            Some(other) => {
                warn!("Preference '{}' holds a {}, expected bool", key, other.kind());
                default
            }
            None => default,
        }
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), PrefsError> {
        self.put(key, PrefValue::Bool(value))
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.value(key) {
            Some(PrefValue::Int(value)) => *value,
            Some(other) => {
                warn!("Preference '{}' holds a {}, expected integer", key, other.kind());
                default
            }
            None => default,
        }
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), PrefsError> {
        self.put(key, PrefValue::Int(value))
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.value(key) {
            Some(PrefValue::String(value)) => Some(value.clone()),
            Some(other) => {
                warn!("Preference '{}' holds a {}, expected string", key, other.kind());
                None
            }
            None => None,
        }
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.put(key, PrefValue::String(value.to_owned()))
    }

    fn delete_key(&mut self, key: &str) -> Result<(), PrefsError> {
        self.remove(key)
    }
}

impl<S: PrefStore + ?Sized> PrefStore for &mut S {
    fn value(&self, key: &str) -> Option<&PrefValue> {
        (**self).value(key)
    }

    fn put(&mut self, key: &str, value: PrefValue) -> Result<(), PrefsError> {
        (**self).put(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        (**self).remove(key)
    }
}

/// Store that lives only in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PrefStore for MemoryStore {
    fn value(&self, key: &str) -> Option<&PrefValue> {
        self.values.get(key)
    }

    fn put(&mut self, key: &str, value: PrefValue) -> Result<(), PrefsError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        self.values.remove(key);
        Ok(())
    }
}
