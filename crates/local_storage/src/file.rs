//! File-backed storage area
//!
//! The whole area is one JSON object of string values, rewritten on every
//! mutation. Writes go to a sibling temp file that is then renamed over the
//! original.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{LocalStorage, StorageError, StorageResult};

type Items = BTreeMap<String, String>;

/// Storage area persisted to a JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStorage {
    /// Opens a storage area at the given path. The file is created lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<Items> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Items::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Items::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, items: &Items) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), entries = items.len(), "Saved storage area");
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Items) -> bool) -> StorageResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;

        let mut items = self.load()?;
        if f(&mut items) {
            self.save(&items)?;
        }
        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;

        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.update(|items| items.remove(key).is_some())
    }
}
