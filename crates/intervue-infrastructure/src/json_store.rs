//! Key-value store implementations.
//!
//! [`JsonFileStore`] keeps every key in one JSON document on disk and
//! rewrites it atomically (tmp file + fsync + rename) on each set, so a
//! crash can never leave a half-written store behind. [`MemoryStore`] backs
//! tests.

use intervue_core::error::{InterviewError, Result};
use intervue_core::repository::KeyValueStore;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File-backed key-value store with atomic whole-document writes.
pub struct JsonFileStore {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens (or creates) a store at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or an
    /// existing store file cannot be read or parsed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let cache = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    /// Opens the store at the default location, `~/.intervue/store.json`.
    pub fn default_location() -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| InterviewError::io("failed to get home directory"))?;
        Self::new(home_dir.join(".intervue").join("store.json"))
    }

    /// Serializes the whole document to a tmp file, fsyncs, and renames it
    /// into place.
    fn persist(&self, cache: &HashMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(cache)?;
        let tmp_path = self.path.with_extension("json.tmp");

        let mut file = File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let cache = self
            .cache
            .lock()
            .map_err(|_| InterviewError::internal("store lock poisoned"))?;
        Ok(cache.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| InterviewError::internal("store lock poisoned"))?;
        cache.insert(key.to_string(), value.to_string());
        self.persist(&cache)
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| InterviewError::internal("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| InterviewError::internal("store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
