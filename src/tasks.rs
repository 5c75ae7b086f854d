//! Async task management for non-blocking API operations.
//!
//! Remote operations run in background tokio tasks while the UI stays
//! responsive. Results come back to the main event loop over an unbounded
//! channel.
//!
//! # Architecture
//!
//! 1. A view asks the `App` to start an [`Operation`]
//! 2. The `App` dispatches the operation's pending action and queues it
//! 3. The main loop drains the queue into [`TaskSpawner::spawn`]
//! 4. The task calls the client and sends a [`TaskResult`] with exactly one
//!    fulfilled or rejected action, stamped with the session generation it
//!    was started under
//! 5. The main loop polls the channel with `try_recv()` and hands results to
//!    the `App`
//!
//! # Adding New Operations
//!
//! 1. Add a variant to `Operation`
//! 2. Give it a pending action in `Operation::pending_action`
//! 3. Map the client call to its completion action in `execute`

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::types::{CreateTicketRequest, CreateUserRequest, TicketUpdate};
use crate::api::HelpdeskClient;
use crate::store::{
    Action, AuthAction, CommentsAction, Rejection, TicketsAction, UsersAction,
};

/// A string that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// A remote operation requested by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Login {
        email: String,
        password: Secret,
    },
    Register {
        name: String,
        email: String,
        password: Secret,
    },
    FetchTickets,
    CreateTicket(CreateTicketRequest),
    FetchTicket(i64),
    UpdateTicket {
        id: i64,
        update: TicketUpdate,
    },
    FetchStatuses,
    FetchPriorities,
    FetchUsers,
    CreateUser(CreateUserRequest),
    FetchComments(i64),
    AddComment {
        ticket_id: i64,
        content: String,
    },
}

impl Operation {
    /// Whether the operation needs a signed-in session.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Operation::Login { .. } | Operation::Register { .. })
    }

    /// The action dispatched before the request is sent.
    pub fn pending_action(&self) -> Action {
        match self {
            Operation::Login { .. } | Operation::Register { .. } => {
                Action::Auth(AuthAction::Pending)
            }
            Operation::FetchTickets => Action::Tickets(TicketsAction::FetchPending),
            Operation::CreateTicket(_) => Action::Tickets(TicketsAction::CreatePending),
            Operation::FetchTicket(_) => Action::Tickets(TicketsAction::FetchOnePending),
            Operation::UpdateTicket { .. } => Action::Tickets(TicketsAction::UpdatePending),
            Operation::FetchStatuses => Action::Tickets(TicketsAction::StatusesPending),
            Operation::FetchPriorities => Action::Tickets(TicketsAction::PrioritiesPending),
            Operation::FetchUsers => Action::Users(UsersAction::FetchPending),
            Operation::CreateUser(_) => Action::Users(UsersAction::CreatePending),
            Operation::FetchComments(ticket_id) => Action::Comments(CommentsAction::FetchPending {
                ticket_id: *ticket_id,
            }),
            Operation::AddComment { .. } => Action::Comments(CommentsAction::AddPending),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Login { .. } => "login",
            Operation::Register { .. } => "register",
            Operation::FetchTickets => "fetch_tickets",
            Operation::CreateTicket(_) => "create_ticket",
            Operation::FetchTicket(_) => "fetch_ticket",
            Operation::UpdateTicket { .. } => "update_ticket",
            Operation::FetchStatuses => "fetch_statuses",
            Operation::FetchPriorities => "fetch_priorities",
            Operation::FetchUsers => "fetch_users",
            Operation::CreateUser(_) => "create_user",
            Operation::FetchComments(_) => "fetch_comments",
            Operation::AddComment { .. } => "add_comment",
        }
    }
}

/// A finished operation and the action that settles it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    /// Session generation the operation was started under.
    pub generation: u64,
    pub operation: Operation,
    pub action: Action,
}

/// Run an operation against the backend and produce its completion action.
///
/// Never fails: errors become rejected actions carrying the normalized
/// message and, when known, the HTTP status.
pub async fn execute(client: &HelpdeskClient, op: &Operation) -> Action {
    fn rejected(op: &Operation, err: crate::api::ApiError) -> Rejection {
        warn!(operation = op.name(), status = ?err.status(), "Operation failed: {}", err);
        Rejection::from(err)
    }

    match op {
        Operation::Login { email, password } => {
            match client.login(email, password.expose()).await {
                Ok(r) => Action::Auth(AuthAction::Fulfilled(r)),
                Err(e) => Action::Auth(AuthAction::Rejected(rejected(op, e))),
            }
        }
        Operation::Register {
            name,
            email,
            password,
        } => match client.register(name, email, password.expose()).await {
            Ok(r) => Action::Auth(AuthAction::Fulfilled(r)),
            Err(e) => Action::Auth(AuthAction::Rejected(rejected(op, e))),
        },
        Operation::FetchTickets => match client.fetch_tickets().await {
            Ok(t) => Action::Tickets(TicketsAction::FetchFulfilled(t)),
            Err(e) => Action::Tickets(TicketsAction::FetchRejected(rejected(op, e))),
        },
        Operation::CreateTicket(request) => match client.create_ticket(request).await {
            Ok(t) => Action::Tickets(TicketsAction::CreateFulfilled(t)),
            Err(e) => Action::Tickets(TicketsAction::CreateRejected(rejected(op, e))),
        },
        Operation::FetchTicket(id) => match client.fetch_ticket(*id).await {
            Ok(t) => Action::Tickets(TicketsAction::FetchOneFulfilled(t)),
            Err(e) => Action::Tickets(TicketsAction::FetchOneRejected(rejected(op, e))),
        },
        Operation::UpdateTicket { id, update } => match client.update_ticket(*id, update).await {
            Ok(t) => Action::Tickets(TicketsAction::UpdateFulfilled(t)),
            Err(e) => Action::Tickets(TicketsAction::UpdateRejected(rejected(op, e))),
        },
        Operation::FetchStatuses => match client.fetch_statuses().await {
            Ok(s) => Action::Tickets(TicketsAction::StatusesFulfilled(s)),
            Err(e) => Action::Tickets(TicketsAction::StatusesRejected(rejected(op, e))),
        },
        Operation::FetchPriorities => match client.fetch_priorities().await {
            Ok(p) => Action::Tickets(TicketsAction::PrioritiesFulfilled(p)),
            Err(e) => Action::Tickets(TicketsAction::PrioritiesRejected(rejected(op, e))),
        },
        Operation::FetchUsers => match client.fetch_users().await {
            Ok(u) => Action::Users(UsersAction::FetchFulfilled(u)),
            Err(e) => Action::Users(UsersAction::FetchRejected(rejected(op, e))),
        },
        Operation::CreateUser(request) => match client.create_user(request).await {
            Ok(u) => Action::Users(UsersAction::CreateFulfilled(u)),
            Err(e) => Action::Users(UsersAction::CreateRejected(rejected(op, e))),
        },
        Operation::FetchComments(ticket_id) => match client.fetch_comments(*ticket_id).await {
            Ok(comments) => Action::Comments(CommentsAction::FetchFulfilled {
                ticket_id: *ticket_id,
                comments,
            }),
            Err(e) => Action::Comments(CommentsAction::FetchRejected {
                ticket_id: *ticket_id,
                rejection: rejected(op, e),
            }),
        },
        Operation::AddComment { ticket_id, content } => {
            match client.add_comment(*ticket_id, content).await {
                Ok(c) => Action::Comments(CommentsAction::AddFulfilled(c)),
                Err(e) => Action::Comments(CommentsAction::AddRejected(rejected(op, e))),
            }
        }
    }
}

/// Spawns background tasks for remote operations.
///
/// Each spawn clones the client (cheap, shared pool and token slot) and
/// sends its result through the channel.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<TaskResult>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<TaskResult>) -> Self {
        Self { tx }
    }

    /// Spawn a task running the given operation.
    ///
    /// `generation` is handed back untouched in the [`TaskResult`].
    pub fn spawn(&self, client: &HelpdeskClient, generation: u64, operation: Operation) {
        let tx = self.tx.clone();
        let client = client.clone();
        debug!(operation = operation.name(), generation, "Spawning task");
        tokio::spawn(async move {
            let action = execute(&client, &operation).await;
            let result = TaskResult {
                generation,
                operation,
                action,
            };
            if tx.send(result).is_err() {
                debug!("Task finished after the event loop closed");
            }
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver should be polled
/// in the main event loop, and the spawner should be used to spawn tasks.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<TaskResult>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}
