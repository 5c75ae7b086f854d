//! User interface components and views.
//!
//! Views own their local input state and return actions; the `App` turns
//! those actions into store dispatches and background operations.

pub mod components;
pub mod theme;
pub mod views;

pub use components::{render_context_help, ErrorDialog, LoadingIndicator, NotificationManager};
pub use views::{
    CreateTicketAction, CreateTicketView, DetailAction, HelpAction, HelpView, LoginAction,
    LoginMode, LoginView, TicketDetailView, TicketListAction, TicketListView, UsersAction,
    UsersView,
};
