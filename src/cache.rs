//! Key/value cache capability
//!
//! Meant for quick single-object storage: one key, one value. Application
//! code depends on the [`Cache`] trait; [`MemoryCache`] is the in-process
//! backend.

use crate::core::{DboError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

pub trait Cache {
    /// Stores `value` under `key`, replacing any previous value.
    fn store(&self, key: &str, value: JsonValue);

    fn fetch(&self, key: &str) -> Option<JsonValue>;

    fn delete(&self, key: &str);

    fn exists(&self, key: &str) -> bool;

    fn store_as<T: Serialize>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(value)?;
        self.store(key, value);
        Ok(())
    }

    /// Fetches and decodes a value. `Ok(None)` when the key is missing.
    fn fetch_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        self.fetch(key)
            .map(|value| {
                serde_json::from_value(value)
                    .map_err(|e| DboError::Cache(format!("cannot decode '{}': {}", key, e)))
            })
            .transpose()
    }
}

/// In-process cache backend
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, JsonValue>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn store(&self, key: &str, value: JsonValue) {
        if self.exists(key) {
            self.delete(key);
        }
        if let Ok(mut entries) = self.entries.lock() {
            debug!(key, "cache store");
            entries.insert(key.to_string(), value);
        }
    }

    fn fetch(&self, key: &str) -> Option<JsonValue> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn delete(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }
}
