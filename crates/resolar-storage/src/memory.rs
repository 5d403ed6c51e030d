//! In-memory storage backend.

use crate::{LocalStorage, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-local storage for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<BTreeMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with [`StorageError::Platform`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Platform("storage unavailable".to_string()));
        }
        Ok(())
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.check()?;
        Ok(self.data.lock().get(key).cloned())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> StorageResult<()> {
        self.check()?;
        let mut data = self.data.lock();
        for (key, value) in items {
            data.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> StorageResult<()> {
        self.check()?;
        let mut data = self.data.lock();
        for key in keys {
            data.remove(*key);
        }
        Ok(())
    }

    fn list_keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.check()?;
        Ok(self
            .data
            .lock()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
