//! Durable client-side key-value storage.
//!
//! A small JSON object persisted as `storage.json` in the state directory.
//! It plays the role browser `localStorage` plays for a web client: the
//! session token and UI preferences live here and survive restarts.
//!
//! Every write goes straight to disk. A missing file is an empty store; a
//! corrupt file is logged and treated as empty so a bad write never locks
//! the user out.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

/// Key holding the opaque session token.
pub const SESSION_KEY: &str = "session_id";
/// Key holding the floating menu visibility preference (`"true"`/`"false"`).
pub const FLOATING_MENU_KEY: &str = "floating_menu_visible";

const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct ClientStorage {
    /// `None` for an in-memory store.
    path: Option<PathBuf>,
    values: Mutex<BTreeMap<String, String>>,
}

impl ClientStorage {
    /// Open (or lazily create) the store under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(STORAGE_FILE);
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "storage file unreadable; starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self { path: Some(path), values: Mutex::new(values) })
    }

    /// A store that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { path: None, values: Mutex::new(BTreeMap::new()) }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be written back.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.lock();
        values.insert(key.to_owned(), value.to_owned());
        self.flush(&values)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be written back.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.lock();
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&values)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source: std::io::Error| StorageError::Io { path: path.clone(), source };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(values)?;
        std::fs::write(path, body).map_err(io_err)
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
