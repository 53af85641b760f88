use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Result, StorageError};

/// Core trait for durable client-side storage.
///
/// A storage backend maps string keys to string values and survives restarts
/// for the same profile. Values are opaque to the backend; callers store JSON
/// documents through [`DurableStorageExt`].
///
/// Backends perform no cross-session coordination: when two sessions share a
/// profile, the last `set` for a key wins.
pub trait DurableStorage: Send + Sync {
    /// Reads the raw value stored under `key`.
    ///
    /// Returns `None` if nothing has been stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`.
    ///
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: DurableStorage + ?Sized> DurableStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Extension trait providing JSON convenience methods for storage backends.
pub trait DurableStorageExt: DurableStorage {
    /// Reads and deserializes the JSON document stored under `key`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` as JSON and stores it under `key`.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }

    /// Returns true if a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

// Blanket implementation for all DurableStorage implementations
impl<T: DurableStorage + ?Sized> DurableStorageExt for T {}

/// Validates a storage key.
///
/// Keys double as file names in [`crate::FileStorage`], so they are limited
/// to ASCII letters, digits, `_` and `-`.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_key_accepts_simple_names() {
        assert!(validate_key("cart").is_ok());
        assert!(validate_key("user_profile-2").is_ok());
    }

    #[test]
    fn validate_key_rejects_empty_and_path_like_keys() {
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(
            validate_key("../cart"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("cart.json"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
