//! Client-local key/value storage
//!
//! This crate models the browser's local storage area: a flat map of string
//! keys to string values that survives restarts of the application. It is
//! the only durable state the auth shell keeps.

mod error;
mod file;

use std::collections::HashMap;
use std::sync::RwLock;

pub use error::*;
pub use file::*;

/// Well-known storage keys
pub mod keys {
    /// Serialized record of the logged-in user
    pub const CURRENT_USER: &str = "currentUser";
}

/// Trait for local storage access
pub trait LocalStorage: Send + Sync {
    /// Gets the value stored under a key
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes a key. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Checks if a key is present
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get_item(key)?.is_some())
    }
}

/// In-memory storage for testing
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage area
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage area with pre-populated items
    pub fn with_items(items: HashMap<String, String>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let items = self
            .items
            .read()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        items.remove(key);
        Ok(())
    }
}
