//! JSON-file storage backend.

use crate::{LocalStorage, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Stores every key in one JSON object on disk.
///
/// The whole map is kept in memory and rewritten through a temp file and a
/// rename on each mutation, so a crash never leaves a half-written file. The
/// file holds the password, so it is created owner-only.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    StorageError::Encoding(format!("{}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened file storage");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        write_private(&self.path, content.as_bytes())?;
        Ok(())
    }
}

/// Atomically replace `path` with `content`, readable by the owner only.
///
/// The temp file is created with mode 0600 before any byte is written and is
/// removed if the write or rename fails.
fn write_private(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "storage".to_string());
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = dir.join(format!(".{}.tmp.{}", file_name, nanos));

    let write_result = (|| -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> StorageResult<()> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        for (key, value) in items {
            next.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> StorageResult<()> {
        let mut entries = self.entries.lock();
        if !keys.iter().any(|key| entries.contains_key(*key)) {
            return Ok(());
        }
        let mut next = entries.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn list_keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        Ok(self
            .entries
            .lock()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage
            .set_items(&[("accessToken", "tok"), ("username", "alice")])
            .unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("accessToken").unwrap(), Some("tok".to_string()));
        assert_eq!(reopened.get("username").unwrap(), Some("alice".to_string()));
    }

    #[test]
    fn test_file_storage_remove_many() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
        storage
            .set_items(&[("a", "1"), ("b", "2"), ("c", "3")])
            .unwrap();

        storage.remove(&["a", "b", "missing"]).unwrap();

        assert_eq!(storage.get("a").unwrap(), None);
        assert_eq!(storage.get("b").unwrap(), None);
        assert_eq!(storage.get("c").unwrap(), Some("3".to_string()));
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nested").join("storage.json")).unwrap();
        assert!(storage.list_keys_with_prefix("").unwrap().is_empty());

        // First write creates the parent directory.
        storage.set("k", "v").unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::Encoding(_))
        ));
    }

    #[test]
    fn test_file_storage_prefix_listing() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
        storage
            .set_items(&[
                ("highlight-enabled-a", "true"),
                ("highlight-enabled-b", "false"),
                ("accessToken", "tok"),
            ])
            .unwrap();

        let mut keys = storage.list_keys_with_prefix("highlight-enabled-").unwrap();
        keys.sort();
        assert_eq!(keys, vec!["highlight-enabled-a", "highlight-enabled-b"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        // A file left behind with loose permissions gets tightened on write.
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let storage = FileStorage::open(&path).unwrap();
        storage.set_items(&[("password", "hunter2")]).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "mode was {:o}", mode & 0o777);
    }

    #[test]
    fn test_file_storage_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();
        storage.remove(&["a"]).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["storage.json".to_string()]);
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage = FileStorage::open(&path).unwrap();
        storage.set("a", "1").unwrap();

        // A directory in place of the file makes the rename fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();

        assert!(matches!(storage.set("b", "2"), Err(StorageError::Io(_))));
        assert_eq!(storage.get("b").unwrap(), None);
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temp file was not cleaned up");
    }
}
