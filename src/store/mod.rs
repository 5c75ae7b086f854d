//! Application state containers.
//!
//! State is split into slices (auth, tickets, users, comments). Each slice is
//! changed only by reducing an [`Action`]. Every remote operation produces a
//! pending action before the request is sent and exactly one fulfilled or
//! rejected action when it completes.

pub mod auth;
pub mod comments;
pub mod tickets;
pub mod users;

use tracing::debug;

use crate::api::types::User;
use crate::api::ApiError;

pub use auth::{AuthAction, AuthState};
pub use comments::{CommentsAction, CommentsState};
pub use tickets::{TicketsAction, TicketsState};
pub use users::{UsersAction, UsersState};

/// A failed operation, as stored in state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The normalized error message.
    pub message: String,
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
}

impl Rejection {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// Whether the server refused the credentials (401/403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

impl From<&ApiError> for Rejection {
    fn from(err: &ApiError) -> Self {
        Self {
            message: err.message(),
            status: err.status(),
        }
    }
}

impl From<ApiError> for Rejection {
    fn from(err: ApiError) -> Self {
        Self::from(&err)
    }
}

/// A state transition, addressed to one slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    Tickets(TicketsAction),
    Users(UsersAction),
    Comments(CommentsAction),
    /// The session ended. Reduced by every slice.
    LoggedOut,
}

impl Action {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Auth(a) => a.label(),
            Action::Tickets(a) => a.label(),
            Action::Users(a) => a.label(),
            Action::Comments(a) => a.label(),
            Action::LoggedOut => "logged_out",
        }
    }

    /// The rejection carried by this action, if it reports a failure.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Action::Auth(AuthAction::Rejected(r)) => Some(r),
            Action::Tickets(a) => a.rejection(),
            Action::Users(UsersAction::FetchRejected(r) | UsersAction::CreateRejected(r)) => {
                Some(r)
            }
            Action::Comments(
                CommentsAction::FetchRejected { rejection: r, .. }
                | CommentsAction::AddRejected(r),
            ) => Some(r),
            _ => None,
        }
    }
}

/// The root state container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub auth: AuthState,
    pub tickets: TicketsState,
    pub users: UsersState,
    pub comments: CommentsState,
}

impl Store {
    /// A store seeded with a restored session.
    pub fn with_session(user: Option<User>, token: Option<String>) -> Self {
        Self {
            auth: AuthState::restored(user, token),
            ..Default::default()
        }
    }

    /// Apply an action to the slice it addresses.
    pub fn dispatch(&mut self, action: Action) {
        debug!(action = action.label(), "Dispatch");
        match action {
            Action::Auth(a) => self.auth.reduce(a),
            Action::Tickets(a) => self.tickets.reduce(a),
            Action::Users(a) => self.users.reduce(a),
            Action::Comments(a) => self.comments.reduce(a),
            Action::LoggedOut => {
                self.auth.reduce(AuthAction::LoggedOut);
                self.tickets.reduce(TicketsAction::LoggedOut);
                self.users.reduce(UsersAction::LoggedOut);
                self.comments.reduce(CommentsAction::LoggedOut);
            }
        }
    }
}
