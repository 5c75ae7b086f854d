//! Session persistence backends.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use super::{Result, Session, SessionError};

/// The keyring service name for helpdesk sessions.
const KEYRING_SERVICE: &str = "helpdesk-tui";

/// The keyring entry holding the session snapshot.
const KEYRING_ENTRY: &str = "session";

/// Where a session snapshot is kept between runs.
pub trait SessionStore: Send {
    /// Read the stored snapshot. `Ok(None)` when nothing is stored.
    fn load(&self) -> Result<Option<Session>>;

    /// Replace the stored snapshot.
    fn save(&self, session: &Session) -> Result<()>;

    /// Remove the stored snapshot. Succeeds when nothing is stored.
    fn clear(&self) -> Result<()>;
}

/// Stores the snapshot as JSON in the local data directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at the default location (`<data_local_dir>/helpdesk-tui/session.json`).
    pub fn new() -> Result<Self> {
        let dir = dirs::data_local_dir().ok_or(SessionError::NoDataDir)?;
        Ok(Self::at(dir.join("helpdesk-tui").join("session.json")))
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        trace!("Read session snapshot from {:?}", self.path);
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        debug!("Saved session snapshot to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed session snapshot {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Stores the snapshot as a secret in the OS keyring.
#[derive(Debug, Clone, Default)]
pub struct KeyringSessionStore;

impl KeyringSessionStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, KEYRING_ENTRY)
            .map_err(|e| SessionError::Keyring(format!("failed to access keyring: {}", e)))
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        match Self::entry()?.get_password() {
            Ok(secret) => Ok(Some(serde_json::from_str(&secret)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SessionError::Keyring(format!(
                "failed to retrieve session: {}",
                e
            ))),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        let secret = serde_json::to_string(session)?;
        Self::entry()?
            .set_password(&secret)
            .map_err(|e| SessionError::Keyring(format!("failed to store session: {}", e)))
    }

    fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SessionError::Keyring(format!(
                "failed to delete session: {}",
                e
            ))),
        }
    }
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw snapshot text.
    #[cfg(test)]
    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.to_string()))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{fixtures, Role};
    use crate::session::SessionContext;
    use tempfile::tempdir;

    fn session() -> Session {
        Session {
            token: "tok".to_string(),
            user: fixtures::user(3, Role::Customer),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::at(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), None);

        store.save(&session()).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), Some(session()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_clear_missing_is_ok() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::at(dir.path().join("session.json"));
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_file_store_snapshot_layout() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::at(dir.path().join("session.json"));
        store.save(&session()).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["token"], "tok");
        assert_eq!(value["user"]["role"], "customer");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileSessionStore::at(&path);
        assert!(matches!(store.load(), Err(SessionError::Serde(_))));
    }

    #[test]
    fn test_context_discards_corrupt_snapshot() {
        let store = MemorySessionStore::with_raw("garbage");
        let ctx = SessionContext::initialize(Box::new(store.clone()));
        assert!(!ctx.is_authenticated());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let a = MemorySessionStore::new();
        let b = a.clone();
        a.save(&session()).unwrap();
        assert_eq!(b.load().unwrap(), Some(session()));
    }
}
