//! Auth slice.

use crate::api::types::{LoginResponse, Role, User};

use super::Rejection;

/// Authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    /// A login or registration is in flight.
    pub loading: bool,
    pub error: Option<String>,
}

/// Auth transitions. Login and registration share them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    Pending,
    Fulfilled(LoginResponse),
    Rejected(Rejection),
    ClearError,
    LoggedOut,
}

impl AuthAction {
    pub fn label(&self) -> &'static str {
        match self {
            AuthAction::Pending => "auth/pending",
            AuthAction::Fulfilled(_) => "auth/fulfilled",
            AuthAction::Rejected(_) => "auth/rejected",
            AuthAction::ClearError => "auth/clear_error",
            AuthAction::LoggedOut => "auth/logged_out",
        }
    }
}

impl AuthState {
    /// State for a session restored at startup.
    pub fn restored(user: Option<User>, token: Option<String>) -> Self {
        Self {
            is_authenticated: user.is_some() && token.is_some(),
            user,
            token,
            ..Default::default()
        }
    }

    /// Role of the signed-in user.
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Id of the signed-in user.
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::Pending => {
                self.loading = true;
                self.error = None;
            }
            AuthAction::Fulfilled(response) => {
                self.loading = false;
                self.is_authenticated = true;
                self.user = Some(response.user);
                self.token = Some(response.token);
            }
            AuthAction::Rejected(rejection) => {
                self.loading = false;
                self.error = Some(rejection.message);
            }
            AuthAction::ClearError => self.error = None,
            AuthAction::LoggedOut => *self = Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures;

    #[test]
    fn test_login_lifecycle() {
        let mut state = AuthState::default();

        state.reduce(AuthAction::Pending);
        assert!(state.loading);

        state.reduce(AuthAction::Fulfilled(LoginResponse {
            user: fixtures::user(1, Role::Customer),
            token: "t".to_string(),
        }));
        assert!(!state.loading);
        assert!(state.is_authenticated);
        assert_eq!(state.role(), Some(Role::Customer));
        assert_eq!(state.user_id(), Some(1));
    }

    #[test]
    fn test_rejected_keeps_signed_out() {
        let mut state = AuthState::default();
        state.reduce(AuthAction::Pending);
        state.reduce(AuthAction::Rejected(Rejection::new(
            "Invalid credentials",
            Some(401),
        )));

        assert!(!state.loading);
        assert!(!state.is_authenticated);
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));

        state.reduce(AuthAction::ClearError);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_pending_clears_previous_error() {
        let mut state = AuthState {
            error: Some("old".to_string()),
            ..Default::default()
        };
        state.reduce(AuthAction::Pending);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_restored_requires_user_and_token() {
        assert!(!AuthState::restored(None, Some("t".into())).is_authenticated);
        assert!(AuthState::restored(Some(fixtures::user(1, Role::Admin)), Some("t".into()))
            .is_authenticated);
    }
}
