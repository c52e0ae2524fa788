use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Storage key under which the session identifier is kept.
pub const SESSION_KEY: &str = "rag_session_id";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("session store read failed: {0}")]
    Read(String),
    #[error("session store write failed: {0}")]
    Write(String),
    #[error("session identifier must not be empty")]
    EmptyId,
}

/// Opaque per-installation guest identifier attached to every backend request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Result<Self, SessionStoreError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionStoreError::EmptyId);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used for badges and log lines.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable key-value capability holding the session identifier.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the stored identifier, or generate one and write it back before returning it.
///
/// A blank stored value is treated as absent and replaced.
pub fn obtain_session_id(store: &mut dyn SessionStore) -> Result<SessionId, SessionStoreError> {
    if let Some(existing) = store.get(SESSION_KEY)? {
        if let Ok(id) = SessionId::new(existing) {
            return Ok(id);
        }
    }

    let id = SessionId::generate();
    store.put(SESSION_KEY, id.as_str())?;
    Ok(id)
}
