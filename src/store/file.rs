use super::{FORMS_STORAGE_KEY, KeyValueStore};
use crate::error::StoreError;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A key-value backend kept in a single JSON object file.
///
/// Every key maps to a JSON string. A missing file reads as an empty store.
/// Writes go to a sibling temp file that is then renamed over the original.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    key: String,
    pretty: bool,
}

pub struct JsonFileStoreBuilder {
    path: PathBuf,
    key: String,
    pretty: bool,
}

impl JsonFileStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: FORMS_STORAGE_KEY.to_string(),
            pretty: false,
        }
    }

    /// Keeps the form list under a different key of the file.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Writes the store file indented for reading by hand.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn build(self) -> JsonFileStore {
        JsonFileStore {
            path: self.path,
            key: self.key,
            pretty: self.pretty,
        }
    }
}

impl JsonFileStore {
    pub fn builder(path: impl Into<PathBuf>) -> JsonFileStoreBuilder {
        JsonFileStoreBuilder::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let encoded = if self.pretty {
            serde_json::to_string_pretty(entries)?
        } else {
            serde_json::to_string(entries)?
        };
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, encoded).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.read_entries()?;
        match entries.get(key) {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Ok(Some(other.to_string())),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), Value::String(value));
        self.write_entries(&entries)
    }

    fn forms_key(&self) -> &str {
        &self.key
    }
}
