//! JSON-file backed key-value store.
//!
//! The whole map is rewritten on every change: staged in a temporary file next
//! to the store, then renamed over it. A missing file is an empty store; a
//! corrupt one is treated as empty and replaced on the next write.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::KeyValueStore;
use crate::errors::StorageError;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "Ignoring malformed store {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };

        log::debug!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(entries)?;
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(content.as_bytes())?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    // Memory only changes once the new map is on disk.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        self.entries = entries;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut entries = self.entries.clone();
        entries.remove(key);
        self.write_entries(&entries)?;
        self.entries = entries;
        Ok(())
    }
}
