//! Users slice.

use crate::api::types::{Role, User};

use super::Rejection;

/// User list state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersState {
    pub users: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// User transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsersAction {
    FetchPending,
    FetchFulfilled(Vec<User>),
    FetchRejected(Rejection),
    CreatePending,
    CreateFulfilled(User),
    CreateRejected(Rejection),
    ClearError,
    LoggedOut,
}

impl UsersAction {
    pub fn label(&self) -> &'static str {
        match self {
            UsersAction::FetchPending => "users/fetch/pending",
            UsersAction::FetchFulfilled(_) => "users/fetch/fulfilled",
            UsersAction::FetchRejected(_) => "users/fetch/rejected",
            UsersAction::CreatePending => "users/create/pending",
            UsersAction::CreateFulfilled(_) => "users/create/fulfilled",
            UsersAction::CreateRejected(_) => "users/create/rejected",
            UsersAction::ClearError => "users/clear_error",
            UsersAction::LoggedOut => "users/logged_out",
        }
    }
}

impl UsersState {
    /// Users holding the given role, in list order.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &User> {
        self.users.iter().filter(move |u| u.role == role)
    }

    pub fn reduce(&mut self, action: UsersAction) {
        match action {
            UsersAction::FetchPending | UsersAction::CreatePending => {
                self.loading = true;
                self.error = None;
            }
            UsersAction::FetchFulfilled(users) => {
                self.loading = false;
                self.users = users;
            }
            UsersAction::CreateFulfilled(user) => {
                self.loading = false;
                self.users.push(user);
            }
            UsersAction::FetchRejected(r) | UsersAction::CreateRejected(r) => {
                self.loading = false;
                self.error = Some(r.message);
            }
            UsersAction::ClearError => self.error = None,
            UsersAction::LoggedOut => *self = Self::default(),
        }
    }
}
