//! Authenticated session state.
//!
//! The session (bearer token plus the signed-in user) is the only state that
//! outlives the process. `SessionContext` reads the persisted snapshot once at
//! startup and is the single place where it changes: `login` and `logout`.
//! The HTTP client reads the token through a `SharedToken` handle.

mod store;

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::types::{LoginResponse, User};

pub use store::{FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore};

/// Errors from session persistence.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Could not determine the data directory.
    #[error("could not determine data directory")]
    NoDataDir,

    /// File system error while reading or writing the snapshot.
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("session data is invalid: {0}")]
    Serde(#[from] serde_json::Error),

    /// OS keyring failure.
    #[error("keyring error: {0}")]
    Keyring(String),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// The persisted session snapshot.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}

/// Shared, read-mostly slot holding the current bearer token.
///
/// Cloning shares the slot. Outside tests, only `SessionContext` writes to it.
#[derive(Debug, Clone, Default)]
pub struct SharedToken(Arc<RwLock<Option<String>>>);

impl SharedToken {
    /// Create a slot holding the given token.
    pub fn new(token: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(token)))
    }

    /// Current token, if any.
    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set(&self, token: Option<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

/// Owner of the authenticated session.
pub struct SessionContext {
    store: Box<dyn SessionStore>,
    current: Option<Session>,
    token: SharedToken,
}

impl SessionContext {
    /// Restore the session from the given store.
    ///
    /// This is the only read of persisted state. A snapshot that cannot be
    /// loaded is discarded and the session starts signed out.
    pub fn initialize(store: Box<dyn SessionStore>) -> Self {
        let current = match store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!("Discarding unreadable session snapshot: {}", e);
                if let Err(e) = store.clear() {
                    warn!("Failed to clear session snapshot: {}", e);
                }
                None
            }
        };

        match &current {
            Some(session) => info!(
                user_id = session.user.id,
                role = %session.user.role,
                "Restored session"
            ),
            None => debug!("No stored session"),
        }

        let token = SharedToken::new(current.as_ref().map(|s| s.token.clone()));
        Self {
            store,
            current,
            token,
        }
    }

    /// Handle to the token slot, for the HTTP client.
    pub fn token_handle(&self) -> SharedToken {
        self.token.clone()
    }

    /// The current session, if signed in.
    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// The signed-in user.
    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    /// Whether a session is active.
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Start a session and persist it.
    ///
    /// The in-memory session is set even if persisting fails; the error is
    /// returned so the caller can warn the user.
    pub fn login(&mut self, session: Session) -> Result<()> {
        info!(user_id = session.user.id, role = %session.user.role, "Signed in");
        self.token.set(Some(session.token.clone()));
        let persisted = self.store.save(&session);
        self.current = Some(session);
        persisted
    }

    /// End the session and remove the persisted snapshot.
    pub fn logout(&mut self) -> Result<()> {
        info!("Signing out, removing stored session");
        self.token.set(None);
        self.current = None;
        self.store.clear()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
