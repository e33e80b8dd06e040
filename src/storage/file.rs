//! JSON-file-backed store
//!
//! The whole map is rewritten on every mutation. Fine for the handful
//! of keys this client keeps; not a database.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ahash::AHashMap;

use crate::core::error::Result;
use crate::storage::KeyValueStore;

pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<AHashMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing entries if the file
    /// is already there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            AHashMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &AHashMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, AHashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir().join(format!("geoclash-store-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn test_roundtrip_through_disk() {
        let path = temp_store_path();
        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set("auth_token", "tok").unwrap();
            store.set("auth_user_id", "42").unwrap();
        }
        {
            let store = JsonFileStore::open(&path).unwrap();
            assert_eq!(store.get("auth_token").unwrap(), Some("tok".to_string()));
            assert_eq!(store.get("auth_user_id").unwrap(), Some("42".to_string()));
            store.remove("auth_token").unwrap();
        }
        {
            let store = JsonFileStore::open(&path).unwrap();
            assert_eq!(store.get("auth_token").unwrap(), None);
            assert_eq!(store.get("auth_user_id").unwrap(), Some("42".to_string()));
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let path = temp_store_path();
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }
}
