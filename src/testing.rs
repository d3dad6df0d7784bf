//! Testing utilities for leadfilter
//!
//! Fixtures shared by the unit tests: a frozen clock and a temporary,
//! file-backed session.
//!
//! Only available when compiled with `cfg(test)`.

use crate::persistence::{FileSessionStore, FilterPersistence};
use crate::resolver::FixedClock;
use chrono::{TimeZone, Utc};
use std::path::Path;
use tempfile::TempDir;

/// Clock frozen at 2024-03-15T12:00:00Z
///
/// # Panics
/// Never; the instant is a valid UTC timestamp.
#[must_use]
pub fn fixed_clock() -> FixedClock<Utc> {
    let now = Utc
        .with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
        .single()
        .expect("valid fixture instant");
    FixedClock::new(now)
}

/// Temporary session directory that is removed on drop
///
/// # Examples
/// ```ignore
/// let session = TempSession::new("s1");
/// let persistence = session.persistence();
/// // directory removed when `session` is dropped
/// ```
pub struct TempSession {
    root: TempDir,
    id: String,
}

impl TempSession {
    /// Create a fresh session root holding session `id`
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new(id: &str) -> Self {
        let root = TempDir::new().expect("Failed to create temp session root");
        Self {
            root,
            id: id.to_string(),
        }
    }

    /// Root directory containing the session directory
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// A file store for this session
    ///
    /// # Panics
    /// Panics if the session id is invalid.
    #[must_use]
    pub fn store(&self) -> FileSessionStore {
        FileSessionStore::open(self.root(), &self.id).expect("valid session id")
    }

    /// Persistence over a fresh store for this session
    #[must_use]
    pub fn persistence(&self) -> FilterPersistence<FileSessionStore> {
        FilterPersistence::new(self.store())
    }
}
