//! Persistent store adapter: typed JSON blobs over a [`KeyValueStore`].

use std::sync::Arc;

use domains::{DomainError, KeyValueStore, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Store keys. The names match what the wall has always written.
pub mod keys {
    pub const CONFESSIONS: &str = "confessions";
    pub const HISTORY: &str = "historyMessages";
    pub const ADMIN_LOGGED_IN: &str = "adminLoggedIn";
    pub const LOGIN_TIME: &str = "loginTime";
}

/// Result of a mutation on an in-memory collection.
///
/// The change to memory always applies; `persisted` reports whether the
/// write-through to the store succeeded.
#[must_use]
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub persisted: Result<()>,
}

impl<T> Mutation<T> {
    pub(crate) fn new(value: T, persisted: Result<()>) -> Self {
        Self { value, persisted }
    }

    /// Collapses into a `Result`, treating a failed write as an error.
    pub fn into_result(self) -> Result<T> {
        self.persisted.map(|_| self.value)
    }
}

#[derive(Clone)]
pub struct PersistentStore {
    kv: Arc<dyn KeyValueStore>,
}

impl PersistentStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// `Ok(None)` when the key was never written, `Corrupt` when the blob
    /// does not parse as `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| DomainError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    /// Serializes `value` and overwrites the whole blob under `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw)
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.kv.get(key)
    }

    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.kv.set(key, value)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.kv.remove(key)
    }
}
