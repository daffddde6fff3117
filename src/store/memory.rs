use super::{FORMS_STORAGE_KEY, KeyValueStore};
use crate::error::StoreError;
use ahash::AHashMap;

/// An in-process key-value backend.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: AHashMap<String, String>,
    key: String,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: AHashMap::new(),
            key: FORMS_STORAGE_KEY.to_string(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds the form list under a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn forms_key(&self) -> &str {
        &self.key
    }
}
