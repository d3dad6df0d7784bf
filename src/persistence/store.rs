//! Session-scoped key/value stores
//!
//! A `SessionStore` behaves like browser session storage: string keys,
//! string values, gone when the session ends. `MemorySessionStore` lives as
//! long as the process; `FileSessionStore` keeps one directory per session id
//! so that several short-lived processes can share a session until
//! `end_session` is called.

use super::error::PersistenceError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// String key/value storage scoped to one session
pub trait SessionStore {
    /// Read a value; `Ok(None)` if the key is absent
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Delete a key; deleting an absent key succeeds
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the backing storage cannot be modified.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;

    /// Delete every key of the session
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the backing storage cannot be modified.
    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// In-process session storage
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.entries.clear();
        Ok(())
    }
}

/// Session storage backed by one directory per session
///
/// Each key is stored as `<key>.json` inside the session directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Open the store for `session_id` under `root`
    ///
    /// The directory is created lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidKey` if the session id is not a plain name.
    pub fn open(root: impl AsRef<Path>, session_id: &str) -> Result<Self, PersistenceError> {
        validate_name(session_id)?;
        Ok(Self {
            dir: root.as_ref().join(session_id),
        })
    }

    /// Open the store for `session_id` under the user cache directory
    ///
    /// Uses `<cache dir>/leadfilter/sessions/<session_id>`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the cache directory cannot be determined or
    /// the session id is invalid.
    pub fn in_cache_dir(session_id: &str) -> Result<Self, PersistenceError> {
        let root = default_session_root().ok_or(PersistenceError::NoSessionDir)?;
        Self::open(root, session_id)
    }

    /// Directory holding this session's keys
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// End the session, deleting everything stored in it
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the session directory exists but cannot be removed.
    pub fn end_session(self) -> Result<(), PersistenceError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        validate_name(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.key_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Root directory for file-backed sessions
#[must_use]
pub fn default_session_root() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("leadfilter").join("sessions"))
}

fn validate_name(name: &str) -> Result<(), PersistenceError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidKey(name.to_string()))
    }
}
