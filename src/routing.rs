//! Screen routes and the access guard.
//!
//! Every screen has a path. Navigation always goes through [`guard`], which
//! decides synchronously from the cached session whether the screen may be
//! shown.

use std::fmt;

use crate::api::types::Role;
use crate::store::AuthState;

/// A screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Tickets,
    TicketDetail(i64),
    NewTicket,
    Users,
    NotFound,
}

impl Route {
    /// The route's path.
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/signup".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Tickets => "/tickets".to_string(),
            Route::TicketDetail(id) => format!("/tickets/{}", id),
            Route::NewTicket => "/tickets/new".to_string(),
            Route::Users => "/users".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Map a path back to a route. `/` is the dashboard; anything unknown is
    /// `NotFound`.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match trimmed {
            "/" | "" | "/dashboard" => Route::Dashboard,
            "/login" => Route::Login,
            "/signup" => Route::Register,
            "/tickets" => Route::Tickets,
            "/tickets/new" => Route::NewTicket,
            "/users" => Route::Users,
            other => other
                .strip_prefix("/tickets/")
                .and_then(|id| id.parse::<i64>().ok())
                .map(Route::TicketDetail)
                .unwrap_or(Route::NotFound),
        }
    }

    /// Title shown in the header.
    pub fn title(&self) -> String {
        match self {
            Route::Login => "Sign in".to_string(),
            Route::Register => "Sign up".to_string(),
            Route::Dashboard => "Dashboard".to_string(),
            Route::Tickets => "Tickets".to_string(),
            Route::TicketDetail(id) => format!("Ticket #{}", id),
            Route::NewTicket => "New ticket".to_string(),
            Route::Users => "Users".to_string(),
            Route::NotFound => "Not found".to_string(),
        }
    }

    /// Whether the route needs a signed-in session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    /// Roles allowed on the route. `None` means any signed-in role.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::NewTicket => Some(&[Role::Customer]),
            Route::Users => Some(&[Role::Admin]),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// The outcome of guarding a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the requested route.
    Allow,
    /// Not signed in; show the login screen and return to `from` afterwards.
    RedirectToLogin { from: Route },
    /// Signed in without the required role.
    Redirect(Route),
}

/// Where a signed-in user without the required role is sent.
pub const ROLE_FALLBACK: Route = Route::Register;

/// Decide whether `route` may be shown for the given auth state.
pub fn guard(route: Route, auth: &AuthState) -> GuardDecision {
    if !route.is_protected() {
        return GuardDecision::Allow;
    }

    if !auth.is_authenticated {
        return GuardDecision::RedirectToLogin { from: route };
    }

    match (route.allowed_roles(), auth.role()) {
        (Some(roles), Some(role)) if roles.contains(&role) => GuardDecision::Allow,
        (Some(_), _) => GuardDecision::Redirect(ROLE_FALLBACK),
        (None, _) => GuardDecision::Allow,
    }
}
