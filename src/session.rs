//! Session key/value store
//!
//! A session is created per request or connection context and handed to
//! whatever needs it; nothing reaches it through global state. Extend it by
//! wrapping a store and adding typed accessors on top of `get`/`set`.

use crate::core::{DboError, Result};
use crate::guid;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::debug;

pub trait SessionStore {
    /// Begins the session. Returns whether a session is active afterwards.
    fn start(&mut self) -> bool;

    /// Ends the session and drops its values. Returns whether the session is inactive afterwards.
    fn destroy(&mut self) -> bool;

    /// `None` for unknown keys and while no session is active
    fn get(&self, key: &str) -> Option<&JsonValue>;

    fn set(&mut self, key: &str, value: JsonValue) -> Result<()>;

    fn is_active(&self) -> bool;

    /// Identifier of the active session
    fn id(&self) -> Option<&str>;
}

/// Session state held in memory
#[derive(Debug, Default)]
pub struct MemorySession {
    id: Option<String>,
    values: HashMap<String, JsonValue>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn start(&mut self) -> bool {
        if self.id.is_none() {
            let id = guid::generate();
            debug!(session = %id, "session started");
            self.id = Some(id);
        }
        true
    }

    fn destroy(&mut self) -> bool {
        if let Some(id) = self.id.take() {
            debug!(session = %id, "session destroyed");
            self.values.clear();
        }
        true
    }

    fn get(&self, key: &str) -> Option<&JsonValue> {
        self.id.as_ref()?;
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: JsonValue) -> Result<()> {
        if self.id.is_none() {
            return Err(DboError::Session(format!(
                "cannot set '{}' without an active session",
                key
            )));
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.id.is_some()
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
