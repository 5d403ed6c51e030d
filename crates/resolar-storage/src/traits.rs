//! Storage trait definitions.

use crate::StorageResult;
use std::collections::HashMap;

/// Key-value persistence backend.
///
/// Multi-key writes and removals go through a single call so a backend can
/// apply them as one logical write.
pub trait LocalStorage: Send + Sync {
    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store several values in one write
    fn set_items(&self, items: &[(&str, &str)]) -> StorageResult<()>;

    /// Remove several keys in one write. Missing keys are ignored.
    fn remove(&self, keys: &[&str]) -> StorageResult<()>;

    /// List all keys that start with a given prefix.
    fn list_keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Store a single value
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.set_items(&[(key, value)])
    }

    /// Retrieve several values; absent keys are left out of the map
    fn get_many(&self, keys: &[&str]) -> StorageResult<HashMap<String, String>> {
        let mut found = HashMap::new();
        for key in keys {
            if let Some(value) = self.get(key)? {
                found.insert((*key).to_string(), value);
            }
        }
        Ok(found)
    }

    /// Check if a key exists
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Lets callers keep a handle on a backend they hand to a manager.
impl<T: LocalStorage + ?Sized> LocalStorage for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set_items(&self, items: &[(&str, &str)]) -> StorageResult<()> {
        (**self).set_items(items)
    }

    fn remove(&self, keys: &[&str]) -> StorageResult<()> {
        (**self).remove(keys)
    }

    fn list_keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        (**self).list_keys_with_prefix(prefix)
    }
}
