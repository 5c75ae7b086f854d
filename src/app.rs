//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern: `update`
//! consumes events, `handle_task_result` folds finished background work into
//! the store, and `view` renders from state. Remote work requested by views
//! is queued as [`Operation`]s and drained by the main loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::api::types::{Role, Ticket, TicketUpdate};
use crate::error::AppError;
use crate::events::{Event, KeyContext};
use crate::routing::{guard, GuardDecision, Route};
use crate::session::{Session, SessionContext};
use crate::store::{Action, AuthAction, Store, TicketsAction, UsersAction};
use crate::tasks::{Operation, Secret, TaskResult};
use crate::ui::views::{dashboard, not_found, ticket_detail};
use crate::ui::{
    render_context_help, theme, CreateTicketAction, CreateTicketView, DetailAction, ErrorDialog,
    HelpAction, HelpView, LoadingIndicator, LoginAction, LoginMode, LoginView, NotificationManager,
    TicketDetailView, TicketListAction, TicketListView, UsersAction as UsersViewAction, UsersView,
};

/// The main application struct that holds all state.
///
/// This implements the Model part of The Elm Architecture (TEA).
pub struct App {
    store: Store,
    session: SessionContext,
    route: Route,
    /// The path that was asked for, shown on the not-found screen.
    requested_path: String,
    /// Where to go after a successful sign-in.
    login_from: Option<Route>,
    should_quit: bool,
    show_help: bool,
    login: LoginView,
    tickets_list: TicketListView,
    detail: TicketDetailView,
    create_ticket: CreateTicketView,
    users: UsersView,
    help: HelpView,
    /// Toasts.
    notifications: NotificationManager,
    /// Blocking alerts.
    error_dialog: ErrorDialog,
    spinner: LoadingIndicator,
    /// Operations waiting to be spawned by the main loop.
    operations: Vec<Operation>,
    /// Bumped on every sign-in and sign-out. Results stamped with an older
    /// value belong to a finished session.
    generation: u64,
}

impl App {
    /// Create the application around a restored session.
    ///
    /// The app starts on the login screen; call [`App::navigate`] or
    /// [`App::open_path`] to pick the first route.
    pub fn new(session: SessionContext) -> Self {
        let store = Store::with_session(
            session.user().cloned(),
            session.session().map(|s| s.token.clone()),
        );
        debug!(authenticated = store.auth.is_authenticated, "Creating application");

        Self {
            store,
            session,
            route: Route::Login,
            requested_path: Route::Login.path(),
            login_from: None,
            should_quit: false,
            show_help: false,
            login: LoginView::new(),
            tickets_list: TicketListView::new(),
            detail: TicketDetailView::new(),
            create_ticket: CreateTicketView::new(),
            users: UsersView::new(),
            help: HelpView::new(),
            notifications: NotificationManager::new(),
            error_dialog: ErrorDialog::new(),
            spinner: LoadingIndicator::new(),
            operations: Vec::new(),
            generation: 0,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn is_error_dialog_visible(&self) -> bool {
        self.error_dialog.is_visible()
    }

    /// Show a blocking alert.
    pub fn show_error_dialog(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.error_dialog.show_message(title, message);
    }

    /// Report an application error: critical ones block, others are toasts.
    pub fn handle_error(&mut self, error: &AppError) {
        warn!("Application error: {}", error);
        if error.is_critical() {
            self.error_dialog.show(error);
        } else {
            self.notifications.error(error.user_message());
        }
    }

    /// Drain the operations queued since the last call.
    ///
    /// Every queued operation belongs to the current
    /// [`session_generation`](App::session_generation).
    pub fn take_operations(&mut self) -> Vec<Operation> {
        std::mem::take(&mut self.operations)
    }

    /// The stamp to spawn queued operations with.
    pub fn session_generation(&self) -> u64 {
        self.generation
    }

    /// Start a new session generation. Work queued for the old one is dropped.
    fn next_generation(&mut self) {
        self.generation += 1;
        if !self.operations.is_empty() {
            debug!(count = self.operations.len(), "Discarding operations from the previous session");
            self.operations.clear();
        }
    }

    /// Navigate to a path such as `/tickets/4`.
    pub fn open_path(&mut self, path: &str) {
        let route = Route::parse(path);
        self.requested_path = path.to_string();
        self.navigate(route);
    }

    /// Navigate to a route, applying the route guard.
    pub fn navigate(&mut self, route: Route) {
        match guard(route, &self.store.auth) {
            GuardDecision::Allow => self.enter(route),
            GuardDecision::RedirectToLogin { from } => {
                debug!(from = %from, "Not signed in, redirecting to login");
                self.login_from = Some(from);
                self.enter(Route::Login);
            }
            GuardDecision::Redirect(to) => {
                warn!(route = %route, role = ?self.store.auth.role(), "Role not allowed, redirecting");
                self.enter(to);
            }
        }
    }

    /// Show a route and run its mount behaviour.
    fn enter(&mut self, route: Route) {
        info!(route = %route, "Navigate");
        if route != Route::NotFound {
            self.requested_path = route.path();
        }
        self.route = route;
        self.show_help = false;

        match route {
            Route::Login | Route::Register => {
                let mode = if route == Route::Login {
                    LoginMode::SignIn
                } else {
                    LoginMode::SignUp
                };
                self.login.set_mode(mode);
                self.store.dispatch(Action::Auth(AuthAction::ClearError));
            }
            Route::Dashboard => {
                self.start(Operation::FetchTickets);
                self.start(Operation::FetchUsers);
            }
            Route::Tickets => {
                if self.store.tickets.tickets.is_empty() {
                    self.start(Operation::FetchTickets);
                }
            }
            Route::TicketDetail(id) => {
                self.detail.open(id);
                self.start(Operation::FetchTicket(id));
                self.start(Operation::FetchComments(id));

                let role = self.store.auth.role();
                let tickets = &self.store.tickets;
                let need_statuses = role.is_some_and(ticket_detail::can_change_status)
                    && tickets.statuses.is_empty()
                    && !tickets.status_loading;
                let manage = role.is_some_and(ticket_detail::can_manage);
                let need_priorities =
                    manage && tickets.priorities.is_empty() && !tickets.priority_loading;
                let need_users =
                    manage && self.store.users.users.is_empty() && !self.store.users.loading;

                if need_statuses {
                    self.start(Operation::FetchStatuses);
                }
                if need_priorities {
                    self.start(Operation::FetchPriorities);
                }
                if need_users {
                    self.start(Operation::FetchUsers);
                }
            }
            Route::NewTicket => self.create_ticket.reset(),
            Route::Users => {
                self.users.close_form();
                self.start(Operation::FetchUsers);
            }
            Route::NotFound => {}
        }
    }

    /// Begin a remote operation: dispatch its pending action and queue it.
    ///
    /// Protected operations without a session send the user to the login
    /// screen instead and nothing is queued.
    pub fn start(&mut self, operation: Operation) {
        if operation.requires_auth() && !self.store.auth.is_authenticated {
            warn!(operation = operation.name(), "Not signed in, redirecting to login");
            self.login_from = Some(self.route).filter(|r| r.is_protected());
            self.enter(Route::Login);
            return;
        }
        self.store.dispatch(operation.pending_action());
        self.operations.push(operation);
    }

    /// Fold a finished background operation into the store.
    ///
    /// Results started under an earlier session generation are dropped.
    pub fn handle_task_result(&mut self, result: TaskResult) {
        let TaskResult {
            generation,
            operation,
            action,
        } = result;

        if generation != self.generation {
            debug!(
                operation = operation.name(),
                generation,
                current = self.generation,
                "Dropping result from an earlier session"
            );
            return;
        }

        let rejection = action.rejection().cloned();
        self.store.dispatch(action);

        let Some(rejection) = rejection else {
            self.on_fulfilled(&operation);
            return;
        };

        match operation {
            // The form shows the auth error.
            Operation::Login { .. } | Operation::Register { .. } => {}
            Operation::FetchTicket(id) if rejection.is_auth_failure() => {
                self.show_error_dialog("Access denied", rejection.message);
                if self.route == Route::TicketDetail(id) {
                    self.navigate(Route::Tickets);
                }
            }
            // The detail screen shows the error in place.
            Operation::FetchTicket(_) | Operation::FetchComments(_) => {}
            Operation::FetchTickets => {
                self.show_error_dialog("Could not load tickets", rejection.message);
                self.store.dispatch(Action::Tickets(TicketsAction::ClearError));
            }
            Operation::CreateTicket(_) => {
                self.show_error_dialog("Could not create ticket", rejection.message);
            }
            Operation::UpdateTicket { .. } => {
                self.show_error_dialog("Could not update ticket", rejection.message);
            }
            Operation::FetchStatuses | Operation::FetchPriorities => {
                self.notifications.warning(rejection.message);
            }
            Operation::FetchUsers => {
                if self.route == Route::Users {
                    self.show_error_dialog("Could not load users", rejection.message);
                    self.store.dispatch(Action::Users(UsersAction::ClearError));
                }
            }
            Operation::CreateUser(_) => {
                self.show_error_dialog("Could not create user", rejection.message);
                self.store.dispatch(Action::Users(UsersAction::ClearError));
            }
            Operation::AddComment { .. } => {
                self.show_error_dialog("Could not add comment", rejection.message);
            }
        }
    }

    fn on_fulfilled(&mut self, operation: &Operation) {
        match operation {
            Operation::Login { .. } | Operation::Register { .. } => self.complete_login(),
            Operation::CreateTicket(_) => {
                self.notifications.success("Ticket created");
                self.create_ticket.reset();
                if self.route == Route::NewTicket {
                    self.navigate(Route::Tickets);
                }
            }
            Operation::UpdateTicket { update, .. } => {
                let message = match &self.store.tickets.selected_ticket {
                    Some(ticket) => describe_update(update, ticket),
                    None => "Ticket updated".to_string(),
                };
                self.notifications.success(message);
            }
            Operation::CreateUser(request) => {
                self.notifications
                    .success(format!("User {} created", request.name));
                self.users.user_created();
            }
            Operation::AddComment { .. } => {
                self.detail.comment_posted();
                self.notifications.success("Comment added");
            }
            _ => {}
        }
    }

    /// Persist the new session and continue to where the user was headed.
    fn complete_login(&mut self) {
        let (Some(user), Some(token)) =
            (self.store.auth.user.clone(), self.store.auth.token.clone())
        else {
            return;
        };
        self.next_generation();
        if let Err(e) = self.session.login(Session { token, user }) {
            self.handle_error(&AppError::from(e));
        }
        self.login.reset();
        let destination = self.login_from.take().unwrap_or(Route::Dashboard);
        self.navigate(destination);
    }

    /// End the session and return to the login screen.
    pub fn logout(&mut self) {
        if let Err(e) = self.session.logout() {
            self.handle_error(&AppError::from(e));
        }
        self.store.dispatch(Action::LoggedOut);
        self.next_generation();
        self.tickets_list = TicketListView::new();
        self.detail = TicketDetailView::new();
        self.create_ticket.reset();
        self.users = UsersView::new();
        self.login_from = None;
        self.notifications.info("Signed out");
        self.enter(Route::Login);
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Quit => {
                info!("Quit event received");
                self.should_quit = true;
            }
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                self.handle_key_event(key);
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => {
                self.spinner.tick();
                self.notifications.tick();
            }
        }
    }

    /// Whether the current screen has a text field or popup that owns the keyboard.
    fn is_capturing(&self) -> bool {
        match self.route {
            Route::Login | Route::Register | Route::NewTicket => true,
            Route::TicketDetail(_) => self.detail.is_capturing(),
            Route::Users => self.users.is_editing(),
            _ => false,
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        // The error dialog blocks all other input.
        if self.error_dialog.is_visible() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.error_dialog.dismiss();
            }
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if let Some(HelpAction::Close) = self.help.handle_input(key) {
                self.show_help = false;
            }
            return;
        }

        if !self.is_capturing() && self.handle_global_key(key) {
            return;
        }

        match self.route {
            Route::Login | Route::Register => {
                // A signed-in user sent here by the role check can still leave.
                if key.code == KeyCode::Esc && self.store.auth.is_authenticated {
                    self.navigate(Route::Dashboard);
                    return;
                }
                if let Some(action) = self.login.handle_input(key, self.store.auth.loading) {
                    self.handle_login_action(action);
                }
            }
            Route::Dashboard => {
                if key.code == KeyCode::Char('r') && key.modifiers == KeyModifiers::NONE {
                    self.start(Operation::FetchTickets);
                    self.start(Operation::FetchUsers);
                }
            }
            Route::Tickets => {
                let action = self
                    .tickets_list
                    .handle_input(key, &self.store.tickets.tickets);
                match action {
                    Some(TicketListAction::Open(id)) => self.navigate(Route::TicketDetail(id)),
                    Some(TicketListAction::Refresh) => self.start(Operation::FetchTickets),
                    None => {}
                }
            }
            Route::TicketDetail(id) => {
                if let Some(action) = self.detail.handle_input(key, &self.store) {
                    self.handle_detail_action(id, action);
                }
            }
            Route::NewTicket => {
                match self.create_ticket.handle_input(key, self.store.tickets.loading) {
                    Some(CreateTicketAction::Submit(request)) => {
                        self.start(Operation::CreateTicket(request))
                    }
                    Some(CreateTicketAction::Cancel) => self.navigate(Route::Tickets),
                    None => {}
                }
            }
            Route::Users => {
                let action =
                    self.users
                        .handle_input(key, &self.store.users.users, self.store.users.loading);
                match action {
                    Some(UsersViewAction::Refresh) => self.start(Operation::FetchUsers),
                    Some(UsersViewAction::Create(request)) => {
                        self.start(Operation::CreateUser(request))
                    }
                    None => {}
                }
            }
            Route::NotFound => {}
        }
    }

    /// Keys that work on every screen without a focused text field.
    /// Returns true if the key was consumed.
    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        if !matches!(key.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT) {
            return false;
        }
        let role = self.store.auth.role();
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.help.reset_scroll();
                self.show_help = true;
            }
            KeyCode::Char('d') if role.is_some() => self.navigate(Route::Dashboard),
            KeyCode::Char('t') if role.is_some() => self.navigate(Route::Tickets),
            KeyCode::Char('n') if role == Some(Role::Customer) => {
                self.navigate(Route::NewTicket)
            }
            KeyCode::Char('u') if role == Some(Role::Admin) => self.navigate(Route::Users),
            KeyCode::Char('L') if role.is_some() => self.logout(),
            _ => return false,
        }
        true
    }

    fn handle_login_action(&mut self, action: LoginAction) {
        match action {
            LoginAction::Login { email, password } => self.start(Operation::Login {
                email,
                password: Secret::new(password),
            }),
            LoginAction::Register {
                name,
                email,
                password,
            } => self.start(Operation::Register {
                name,
                email,
                password: Secret::new(password),
            }),
            LoginAction::SwitchMode => {
                let next = if self.route == Route::Login {
                    Route::Register
                } else {
                    Route::Login
                };
                self.navigate(next);
            }
        }
    }

    fn handle_detail_action(&mut self, id: i64, action: DetailAction) {
        match action {
            DetailAction::Back => self.navigate(Route::Tickets),
            DetailAction::Reload => {
                self.start(Operation::FetchTicket(id));
                self.start(Operation::FetchComments(id));
            }
            DetailAction::ChangeStatus { status_id, name } => {
                debug!(ticket_id = id, status = %name, "Changing status");
                self.start(Operation::UpdateTicket {
                    id,
                    update: TicketUpdate::status(status_id),
                });
            }
            DetailAction::ChangePriority { priority_id, name } => {
                debug!(ticket_id = id, priority = %name, "Changing priority");
                self.start(Operation::UpdateTicket {
                    id,
                    update: TicketUpdate::priority(priority_id),
                });
            }
            DetailAction::Assign { agent_id, name } => {
                debug!(ticket_id = id, agent = %name, "Assigning ticket");
                self.start(Operation::UpdateTicket {
                    id,
                    update: TicketUpdate::assignee(agent_id),
                });
            }
            DetailAction::AddComment(content) => self.start(Operation::AddComment {
                ticket_id: id,
                content,
            }),
        }
    }

    /// The key binding context for the footer.
    pub fn key_context(&self) -> KeyContext {
        if self.show_help {
            return KeyContext::Help;
        }
        match self.route {
            Route::Login => KeyContext::Login,
            Route::Register => KeyContext::Register,
            Route::Dashboard => KeyContext::Dashboard,
            Route::Tickets => KeyContext::TicketList,
            Route::TicketDetail(_) => self.detail.key_context(),
            Route::NewTicket => KeyContext::CreateTicket,
            Route::Users if self.users.is_editing() => KeyContext::UserForm,
            Route::Users => KeyContext::Users,
            Route::NotFound => KeyContext::NotFound,
        }
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_content(frame, chunks[1]);
        render_context_help(frame, chunks[2], self.key_context());

        if self.show_help {
            self.help.render(frame, chunks[1]);
        }
        self.notifications.render(frame, area);
        self.error_dialog.render(frame, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" Helpdesk ", theme::title_style()),
            Span::styled(
                format!("│ {} ", self.route.title()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];

        if let Some(user) = &self.store.auth.user {
            let nav = match user.role {
                Role::Admin => "│ [d] Dashboard  [t] Tickets  [u] Users  [L] Logout",
                Role::Agent => "│ [d] Dashboard  [t] Tickets  [L] Logout",
                Role::Customer => "│ [d] Dashboard  [t] Tickets  [n] New Ticket  [L] Logout",
            };
            spans.push(Span::styled(nav, Style::default().fg(theme::MUTED)));
            spans.push(Span::raw("  "));
            spans.push(Span::raw(format!("{} ", user.name)));
            spans.push(Span::styled(
                format!("({})", user.role),
                Style::default().fg(theme::role_color(user.role)),
            ));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(theme::MUTED)),
            ),
            area,
        );
    }

    fn render_content(&mut self, frame: &mut Frame, area: Rect) {
        match self.route {
            Route::Login | Route::Register => self.login.render(
                frame,
                area,
                self.store.auth.error.as_deref(),
                self.store.auth.loading,
                &self.spinner,
            ),
            Route::Dashboard => {
                if let Some(user) = &self.store.auth.user {
                    dashboard::render(
                        frame,
                        area,
                        user,
                        &self.store.tickets.tickets,
                        &self.store.users.users,
                        self.store.tickets.loading,
                        &self.spinner,
                    );
                }
            }
            Route::Tickets => {
                let role = self.store.auth.role().unwrap_or(Role::Customer);
                self.tickets_list.render(
                    frame,
                    area,
                    &self.store.tickets.tickets,
                    role,
                    self.store.tickets.loading,
                    &self.spinner,
                );
            }
            Route::TicketDetail(_) => self.detail.render(frame, area, &self.store, &self.spinner),
            Route::NewTicket => {
                self.create_ticket
                    .render(frame, area, self.store.tickets.loading, &self.spinner)
            }
            Route::Users => self.users.render(
                frame,
                area,
                &self.store.users.users,
                self.store.users.loading,
                &self.spinner,
            ),
            Route::NotFound => not_found::render(frame, area, &self.requested_path),
        }
    }
}

/// Toast text for a successful ticket update.
fn describe_update(update: &TicketUpdate, ticket: &Ticket) -> String {
    if update.status_id.is_some() {
        format!("Status changed to {}", ticket.status_label())
    } else if update.priority_id.is_some() {
        format!("Priority changed to {}", ticket.priority_label())
    } else if update.assigned_to.is_some() {
        format!("Ticket assigned to {}", ticket.assignee_label())
    } else {
        format!("Ticket #{} updated", ticket.id)
    }
}
