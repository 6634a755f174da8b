//! File-backed primary medium.
//!
//! One JSON object per origin, holding every key. Size accounting follows
//! the browser model: the sum of key and value lengths must stay within
//! the quota, otherwise the write is rejected and nothing changes on disk.
//! A file that no longer parses is replaced by the next write.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::medium::{StorageError, StorageMedium};

pub struct LocalStorage {
    path: PathBuf,
    quota_bytes: Option<u64>,
}

impl LocalStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            quota_bytes: None,
        }
    }

    /// Reject writes that would grow the stored data beyond `quota_bytes`.
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(items).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;

        fs::write(&self.path, content).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn used_bytes(items: &BTreeMap<String, String>) -> u64 {
    items
        .iter()
        .map(|(k, v)| (k.len() + v.len()) as u64)
        .sum()
}

impl StorageMedium for LocalStorage {
    fn name(&self) -> &'static str {
        "local-storage"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = match self.read_all() {
            Ok(items) => items,
            Err(e @ StorageError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "Discarding unreadable storage file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        items.insert(key.to_string(), value.to_string());

        if let Some(quota) = self.quota_bytes {
            let needed = used_bytes(&items);
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("local_storage.json"));
        assert_eq!(storage.get_item("anything").unwrap(), None);
    }

    #[test]
    fn set_then_get_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("local_storage.json");
        let storage = LocalStorage::new(path.clone());

        storage.set_item("k", "v").unwrap();
        assert!(path.exists());
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn keys_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("ls.json"));

        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();
        storage.remove_item("a").unwrap();

        assert_eq!(storage.get_item("a").unwrap(), None);
        assert_eq!(storage.get_item("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn quota_rejects_write_and_keeps_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("ls.json")).with_quota(16);

        storage.set_item("key", "small").unwrap();
        let err = storage
            .set_item("key", "a value that does not fit")
            .unwrap_err();

        assert!(matches!(err, StorageError::QuotaExceeded { quota: 16, .. }));
        assert_eq!(storage.get_item("key").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ls.json");
        fs::write(&path, "{not json").unwrap();

        let storage = LocalStorage::new(path);
        assert!(matches!(
            storage.get_item("k"),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn write_replaces_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ls.json");
        fs::write(&path, "{{{{").unwrap();

        let storage = LocalStorage::new(path);
        storage.set_item("k", "v").unwrap();

        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
