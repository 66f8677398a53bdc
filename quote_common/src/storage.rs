//! Key-value persistence behind the quote store.
//!
//! The store never touches the filesystem directly; it talks to a
//! `KeyValueStorage`, which lets the same code run against a durable
//! directory or an in-memory map (session data, tests).

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::QuoteError;
use crate::result::Result;

/// Key holding the JSON array of persisted quotes.
pub const QUOTES_KEY: &str = "quotes";
/// Key holding the last selected category filter.
pub const LAST_FILTER_KEY: &str = "lastFilter";
/// Session key holding the last displayed quote.
pub const LAST_QUOTE_KEY: &str = "lastQuote";

/// Minimal string key-value storage.
pub trait KeyValueStorage: Send {
    /// Read the value stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Non-durable storage kept in process memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Durable storage: one file per key inside a directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a crash
/// mid-write leaves the previous value readable.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the storage directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            QuoteError::Storage(format!("cannot create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    /// Directory the values are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuoteError::Storage(format!("cannot read '{key}': {e}"))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| QuoteError::Storage(format!("cannot write '{key}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get(QUOTES_KEY).unwrap(), None);
        storage.set(QUOTES_KEY, "[]").unwrap();
        storage.set(QUOTES_KEY, "[1]").unwrap();
        assert_eq!(storage.get(QUOTES_KEY).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn file_storage_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path()).unwrap();
        assert_eq!(storage.get(LAST_FILTER_KEY).unwrap(), None);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp_dir.path().join("nested")).unwrap();
        storage.set(LAST_FILTER_KEY, "Wisdom").unwrap();

        let reopened = FileStorage::open(temp_dir.path().join("nested")).unwrap();
        assert_eq!(reopened.get(LAST_FILTER_KEY).unwrap().as_deref(), Some("Wisdom"));
        assert!(!reopened.dir().join("lastFilter.json.tmp").exists());
    }

    #[test]
    fn file_storage_reports_write_failures() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp_dir.path()).unwrap();
        // A directory squatting on the target path makes the rename fail.
        std::fs::create_dir(temp_dir.path().join("quotes.json")).unwrap();
        std::fs::write(temp_dir.path().join("quotes.json").join("x"), "x").unwrap();

        let result = storage.set(QUOTES_KEY, "[]");
        assert!(matches!(result, Err(QuoteError::Storage(_))));
    }
}
