//! # redb-backed Session Store
//!
//! Disk-backed session persistence using the redb embedded database.
//!
//! One table maps session id -> serialized [`SessionState`] (the `formats`
//! header + postcard payload). redb provides ACID transactions and crash
//! safety, so a session survives server restarts and page reloads without
//! any external service.

use crate::formats::{state_from_bytes, state_to_bytes};
use crate::session::SessionState;
use crate::types::CompassError;
use redb::{Database, ReadableDatabase, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for sessions: session id -> serialized SessionState bytes.
const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// A disk-backed session store.
pub struct RedbSessions {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for RedbSessions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbSessions").finish_non_exhaustive()
    }
}

impl RedbSessions {
    /// Open or create a session database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CompassError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| CompassError::Io(e.to_string()))?;

        // Initialize the table if it doesn't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| CompassError::Io(e.to_string()))?;
            let _ = write_txn
                .open_table(SESSIONS)
                .map_err(|e| CompassError::Io(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| CompassError::Io(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Load a session by id, if present.
    pub fn load(&self, id: &str) -> Result<Option<SessionState>, CompassError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CompassError::Io(e.to_string()))?;
        let table = read_txn
            .open_table(SESSIONS)
            .map_err(|e| CompassError::Io(e.to_string()))?;

        let Some(guard) = table
            .get(id)
            .map_err(|e| CompassError::Io(e.to_string()))?
        else {
            return Ok(None);
        };

        state_from_bytes(guard.value()).map(Some)
    }

    /// Save a session under its id, replacing any previous state.
    pub fn save(&self, id: &str, state: &SessionState) -> Result<(), CompassError> {
        let bytes = state_to_bytes(state)?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CompassError::Io(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SESSIONS)
                .map_err(|e| CompassError::Io(e.to_string()))?;
            table
                .insert(id, bytes.as_slice())
                .map_err(|e| CompassError::Io(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| CompassError::Io(e.to_string()))?;

        Ok(())
    }

    /// Remove a session. Returns whether it existed.
    pub fn remove(&self, id: &str) -> Result<bool, CompassError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| CompassError::Io(e.to_string()))?;
        let existed = {
            let mut table = write_txn
                .open_table(SESSIONS)
                .map_err(|e| CompassError::Io(e.to_string()))?;
            table
                .remove(id)
                .map_err(|e| CompassError::Io(e.to_string()))?
                .is_some()
        };
        write_txn
            .commit()
            .map_err(|e| CompassError::Io(e.to_string()))?;

        Ok(existed)
    }

    /// Number of stored sessions.
    pub fn len(&self) -> Result<usize, CompassError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| CompassError::Io(e.to_string()))?;
        let table = read_txn
            .open_table(SESSIONS)
            .map_err(|e| CompassError::Io(e.to_string()))?;
        let count = table.len().map_err(|e| CompassError::Io(e.to_string()))?;
        Ok(count as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, RedbSessions) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbSessions::open(dir.path().join("sessions.redb")).expect("open");
        (dir, store)
    }

    #[test]
    fn save_load_roundtrip() {
        let (_dir, store) = open_temp();

        let mut state = SessionState::new();
        state.begin_questionnaire("Ada", "MIT").expect("advance");

        store.save("s1", &state).expect("save");
        let loaded = store.load("s1").expect("load").expect("present");
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_session_is_none() {
        let (_dir, store) = open_temp();
        assert!(store.load("missing").expect("load").is_none());
    }

    #[test]
    fn save_replaces_previous_state() {
        let (_dir, store) = open_temp();

        let mut state = SessionState::new();
        store.save("s1", &state).expect("save fresh");

        state.begin_questionnaire("Ada", "MIT").expect("advance");
        store.save("s1", &state).expect("save advanced");

        let loaded = store.load("s1").expect("load").expect("present");
        assert_eq!(loaded.identity().map(|i| i.name.as_str()), Some("Ada"));
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn remove_reports_presence() {
        let (_dir, store) = open_temp();

        store.save("s1", &SessionState::new()).expect("save");
        assert!(store.remove("s1").expect("remove"));
        assert!(!store.remove("s1").expect("remove again"));
        assert_eq!(store.len().expect("len"), 0);
    }

    #[test]
    fn reopen_preserves_sessions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sessions.redb");

        {
            let store = RedbSessions::open(&path).expect("open");
            store.save("s1", &SessionState::new()).expect("save");
        }

        let store = RedbSessions::open(&path).expect("reopen");
        assert!(store.load("s1").expect("load").is_some());
    }
}
