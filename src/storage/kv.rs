use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// String key-value store holding serialized blobs
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under a key, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under a key
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key (no-op if absent)
    fn remove(&self, key: &str) -> Result<()>;

    /// Move an unreadable value aside so it is not loaded again
    fn quarantine(&self, key: &str) -> Result<()> {
        self.remove(key)
    }
}

/// Directory-backed store: one `<key>.json` file per key
/// Uses atomic write pattern with .tmp file for safety
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        FileStore { dir }
    }

    /// Path of the file holding a key
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(anyhow!("Invalid storage key '{}'", key));
    }
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        let path = self.key_path(key);

        if !path.exists() {
            log::debug!("No stored value for '{}' at {:?}", key, path);
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;

        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        let path = self.key_path(key);
        let tmp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {:?}", self.dir))?;

        fs::write(&tmp_path, value)
            .with_context(|| format!("Failed to write to temporary file {:?}", tmp_path))?;

        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to rename {:?} to {:?}", tmp_path, path))?;

        log::debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        check_key(key)?;
        let path = self.key_path(key);

        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        }
        Ok(())
    }

    fn quarantine(&self, key: &str) -> Result<()> {
        check_key(key)?;
        let path = self.key_path(key);
        let backup_path = path.with_extension("json.corrupted");

        fs::rename(&path, &backup_path)
            .with_context(|| format!("Failed to back up {:?} to {:?}", path, backup_path))?;

        log::warn!("Moved unreadable {:?} to {:?}", path, backup_path);
        Ok(())
    }
}

/// In-process store, mostly for tests
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));

        assert_eq!(store.get("hostelRooms").unwrap(), None);

        store.set("hostelRooms", "[]").unwrap();
        assert_eq!(store.get("hostelRooms").unwrap().as_deref(), Some("[]"));
        assert!(store.key_path("hostelRooms").exists());
        assert!(!store.key_path("hostelRooms").with_extension("json.tmp").exists());

        store.remove("hostelRooms").unwrap();
        assert_eq!(store.get("hostelRooms").unwrap(), None);
    }

    #[test]
    fn test_file_store_quarantine() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        store.set("allocatedRooms", "not json").unwrap();
        store.quarantine("allocatedRooms").unwrap();

        assert_eq!(store.get("allocatedRooms").unwrap(), None);
        assert!(dir.path().join("allocatedRooms.json.corrupted").exists());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.quarantine("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
