//! Filter persistence
//!
//! Keeps the last applied `FilterSnapshot` under one fixed key of a
//! session-scoped store. Filters are transient working state: they survive
//! navigation within a session and nothing more.
//!
//! Loading never fails. A missing, unreadable or malformed payload means "no
//! saved filters" and is only logged.

pub mod error;
pub mod store;

pub use error::PersistenceError;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, default_session_root};

use crate::snapshot::FilterSnapshot;
use tracing::{debug, warn};

/// Default storage key for the filter snapshot
pub const DEFAULT_STORAGE_KEY: &str = "lead_filter_state";

/// Reads and writes the filter snapshot under one key
#[derive(Debug, Clone)]
pub struct FilterPersistence<S: SessionStore> {
    store: S,
    key: String,
}

impl<S: SessionStore> FilterPersistence<S> {
    /// Persist under `DEFAULT_STORAGE_KEY`
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Persist under a custom key
    #[must_use]
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Write the snapshot, overwriting any previous value
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the snapshot cannot be serialized or the
    /// store cannot be written.
    pub fn save(&mut self, snapshot: &FilterSnapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(snapshot)?;
        self.store.set(&self.key, &json)?;
        debug!(key = %self.key, bytes = json.len(), "saved filter snapshot");
        Ok(())
    }

    /// Read the last saved snapshot
    ///
    /// Returns `None` if nothing is stored or the stored value cannot be read
    /// or parsed.
    #[must_use]
    pub fn load(&self) -> Option<FilterSnapshot> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "could not read saved filters");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(key = %self.key, error = %e, "ignoring malformed saved filters");
                None
            }
        }
    }

    /// Remove the saved snapshot
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the store cannot be modified.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(&self.key)
    }
}
