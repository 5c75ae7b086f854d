//! Application views (screens).

pub mod create_ticket;
pub mod dashboard;
mod help;
pub mod login;
pub mod not_found;
pub mod ticket_detail;
pub mod tickets_list;
pub mod users;

pub use create_ticket::{CreateTicketAction, CreateTicketView};
pub use help::{HelpAction, HelpView};
pub use login::{LoginAction, LoginMode, LoginView};
pub use ticket_detail::{DetailAction, TicketDetailView};
pub use tickets_list::{TicketListAction, TicketListView};
pub use users::{UsersAction, UsersView};
