//! # Session Storage
//!
//! Per-session persistent key-value storage for [`SessionState`].
//!
//! Two backends:
//! - `InMemory`: a BTreeMap (fast, volatile; tests and dev mode)
//! - `Persistent`: redb-backed, survives restarts
//!
//! The store itself is synchronous and single-threaded; the app layer
//! serializes access behind an async lock.

pub mod redb_store;

pub use redb_store::RedbSessions;

use crate::session::SessionState;
use crate::types::CompassError;
use std::collections::BTreeMap;
use std::path::Path;

/// Storage backend for session state.
#[derive(Debug)]
pub enum StoreBackend {
    /// In-memory map (fast, volatile).
    InMemory(BTreeMap<String, SessionState>),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbSessions),
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::InMemory(BTreeMap::new())
    }
}

/// The session store used by the web layer: load on request arrival, save on
/// every state change, keyed by the opaque session id in the URL.
#[derive(Debug, Default)]
pub struct SessionStore {
    backend: StoreBackend,
}

impl SessionStore {
    /// Create a volatile in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Create a disk-backed store at the given path.
    pub fn persistent(path: impl AsRef<Path>) -> Result<Self, CompassError> {
        Ok(Self {
            backend: StoreBackend::Persistent(RedbSessions::open(path)?),
        })
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StoreBackend::Persistent(_))
    }

    /// Load a session by id, if present.
    pub fn load(&self, id: &str) -> Result<Option<SessionState>, CompassError> {
        match &self.backend {
            StoreBackend::InMemory(map) => Ok(map.get(id).cloned()),
            StoreBackend::Persistent(redb) => redb.load(id),
        }
    }

    /// Save a session under its id, replacing any previous state.
    pub fn save(&mut self, id: &str, state: &SessionState) -> Result<(), CompassError> {
        match &mut self.backend {
            StoreBackend::InMemory(map) => {
                map.insert(id.to_string(), state.clone());
                Ok(())
            }
            StoreBackend::Persistent(redb) => redb.save(id, state),
        }
    }

    /// Remove a session. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> Result<bool, CompassError> {
        match &mut self.backend {
            StoreBackend::InMemory(map) => Ok(map.remove(id).is_some()),
            StoreBackend::Persistent(redb) => redb.remove(id),
        }
    }

    /// Number of stored sessions.
    pub fn len(&self) -> Result<usize, CompassError> {
        match &self.backend {
            StoreBackend::InMemory(map) => Ok(map.len()),
            StoreBackend::Persistent(redb) => redb.len(),
        }
    }

    /// True when no sessions are stored.
    pub fn is_empty(&self) -> Result<bool, CompassError> {
        Ok(self.len()? == 0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
