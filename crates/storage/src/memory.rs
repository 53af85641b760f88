use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{Result, StorageError, store::DurableStorage, validate_key};

#[derive(Debug, Default)]
struct InMemoryState {
    entries: HashMap<String, String>,
    fail_on_read: bool,
    fail_on_write: bool,
    writes: usize,
}

/// In-memory storage implementation for testing.
///
/// Clones share the same underlying map, so a store handed to a service can
/// still be inspected by the test that created it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a raw value, as if written by an
    /// earlier session.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .insert(key.into(), value.into());
        storage
    }

    /// Configures the store to fail every subsequent `get`.
    pub fn set_fail_on_read(&self, fail: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fail_on_read = fail;
    }

    /// Configures the store to fail every subsequent `set` and `remove`.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fail_on_write = fail;
    }

    /// Returns the number of successful writes (sets and removes).
    pub fn write_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .writes
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DurableStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);

        if state.fail_on_read {
            return Err(StorageError::Io(std::io::Error::other(
                "simulated read failure",
            )));
        }

        Ok(state.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if state.fail_on_write {
            return Err(StorageError::Io(std::io::Error::other(
                "simulated write failure",
            )));
        }

        state.entries.insert(key.to_string(), value.to_string());
        state.writes += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if state.fail_on_write {
            return Err(StorageError::Io(std::io::Error::other(
                "simulated write failure",
            )));
        }

        state.entries.remove(key);
        state.writes += 1;
        Ok(())
    }
}
