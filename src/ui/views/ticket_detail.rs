//! Ticket detail screen.
//!
//! Shows one ticket and its comment thread. Staff can change the status
//! (after confirmation); admins can also change the priority and assign an
//! agent. Customers and agents can post comments.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::api::types::{Role, Ticket};
use crate::events::KeyContext;
use crate::store::Store;
use crate::ui::components::{
    format_timestamp, CommentAction, CommentThread, ConfirmAction, ConfirmDialog,
    LoadingIndicator, Picker, PickerAction, PickerItem,
};
use crate::ui::theme;

/// Who may do what on this screen.
pub fn can_change_status(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Agent)
}

pub fn can_manage(role: Role) -> bool {
    role == Role::Admin
}

pub fn can_comment(role: Role) -> bool {
    matches!(role, Role::Customer | Role::Agent)
}

/// Actions returned from the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    Back,
    Reload,
    ChangeStatus { status_id: i64, name: String },
    ChangePriority { priority_id: i64, name: String },
    Assign { agent_id: i64, name: String },
    AddComment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerKind {
    Status,
    Priority,
    Assignee,
}

/// The ticket detail view.
#[derive(Debug)]
pub struct TicketDetailView {
    ticket_id: Option<i64>,
    thread: CommentThread,
    picker: Picker,
    picker_kind: Option<PickerKind>,
    confirm: ConfirmDialog,
    /// Status chosen in the picker, waiting for confirmation.
    pending_status: Option<(i64, String)>,
}

impl Default for TicketDetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketDetailView {
    pub fn new() -> Self {
        Self {
            ticket_id: None,
            thread: CommentThread::new(),
            picker: Picker::new(),
            picker_kind: None,
            confirm: ConfirmDialog::new(),
            pending_status: None,
        }
    }

    /// Prepare the view for a ticket. Opening the same ticket again keeps
    /// an unsent comment draft.
    pub fn open(&mut self, ticket_id: i64) {
        if self.ticket_id != Some(ticket_id) {
            self.thread.reset();
        }
        self.ticket_id = Some(ticket_id);
        self.picker.hide();
        self.picker_kind = None;
        self.confirm.hide();
        self.pending_status = None;
    }

    /// The server accepted the comment.
    pub fn comment_posted(&mut self) {
        self.thread.finish_composing();
    }

    /// Whether a popup or the composer is capturing input.
    pub fn is_capturing(&self) -> bool {
        self.thread.is_composing() || self.picker.is_visible() || self.confirm.is_visible()
    }

    pub fn key_context(&self) -> KeyContext {
        if self.confirm.is_visible() {
            KeyContext::Confirm
        } else if self.picker.is_visible() {
            KeyContext::Picker
        } else if self.thread.is_composing() {
            KeyContext::CommentComposer
        } else {
            KeyContext::TicketDetail
        }
    }

    fn current_ticket<'a>(&self, store: &'a Store) -> Option<&'a Ticket> {
        store
            .tickets
            .selected_ticket
            .as_ref()
            .filter(|t| Some(t.id) == self.ticket_id)
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent, store: &Store) -> Option<DetailAction> {
        if self.confirm.is_visible() {
            return match self.confirm.handle_input(key)? {
                ConfirmAction::Confirm => self
                    .pending_status
                    .take()
                    .map(|(status_id, name)| DetailAction::ChangeStatus { status_id, name }),
                ConfirmAction::Cancel => {
                    self.pending_status = None;
                    None
                }
            };
        }

        if self.picker.is_visible() {
            return match self.picker.handle_input(key)? {
                PickerAction::Select(id, name) => self.on_pick(id, name),
                PickerAction::Cancel => {
                    self.picker_kind = None;
                    None
                }
            };
        }

        if self.thread.is_composing() {
            if store.comments.submitting {
                return None;
            }
            return match self.thread.handle_input(key)? {
                CommentAction::Submit(content) => Some(DetailAction::AddComment(content)),
                CommentAction::Cancel => None,
            };
        }

        let role = store.auth.role()?;
        let ticket = self.current_ticket(store);

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Backspace, _) => Some(DetailAction::Back),
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(DetailAction::Reload),
            (KeyCode::Char('s'), KeyModifiers::NONE) if can_change_status(role) => {
                let ticket = ticket?;
                let items = store
                    .tickets
                    .statuses
                    .iter()
                    .map(|s| PickerItem::new(s.id, &s.name).with_color(theme::status_color(&s.name)))
                    .collect();
                let empty = loading_or_empty(store.tickets.status_loading, "statuses");
                self.open_picker(PickerKind::Status, "Change Status", items, ticket.status_id, empty);
                None
            }
            (KeyCode::Char('p'), KeyModifiers::NONE) if can_manage(role) => {
                let ticket = ticket?;
                let items = store
                    .tickets
                    .priorities
                    .iter()
                    .map(|p| {
                        PickerItem::new(p.id, &p.name).with_color(theme::priority_color(&p.name))
                    })
                    .collect();
                let empty = loading_or_empty(store.tickets.priority_loading, "priorities");
                self.open_picker(
                    PickerKind::Priority,
                    "Change Priority",
                    items,
                    ticket.priority_id,
                    empty,
                );
                None
            }
            (KeyCode::Char('a'), KeyModifiers::NONE) if can_manage(role) => {
                let ticket = ticket?;
                let items = store
                    .users
                    .with_role(Role::Agent)
                    .map(|u| PickerItem::new(u.id, &u.name))
                    .collect();
                let empty = loading_or_empty(store.users.loading, "agents");
                self.open_picker(
                    PickerKind::Assignee,
                    "Assign Agent",
                    items,
                    ticket.assigned_to,
                    empty,
                );
                None
            }
            (KeyCode::Char('c'), KeyModifiers::NONE) if can_comment(role) => {
                ticket?;
                self.thread.start_composing();
                None
            }
            _ => {
                self.thread.handle_input(key);
                None
            }
        }
    }

    fn open_picker(
        &mut self,
        kind: PickerKind,
        title: &str,
        items: Vec<PickerItem>,
        current: Option<i64>,
        empty: String,
    ) {
        self.picker_kind = Some(kind);
        self.picker.show(title, items, current, empty);
    }

    fn on_pick(&mut self, id: i64, name: String) -> Option<DetailAction> {
        match self.picker_kind.take()? {
            PickerKind::Status => {
                self.confirm
                    .show("Change Status", format!("Change the status to \"{}\"?", name));
                self.pending_status = Some((id, name));
                None
            }
            PickerKind::Priority => Some(DetailAction::ChangePriority {
                priority_id: id,
                name,
            }),
            PickerKind::Assignee => Some(DetailAction::Assign { agent_id: id, name }),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, store: &Store, spinner: &LoadingIndicator) {
        let Some(ticket) = self.current_ticket(store) else {
            self.render_placeholder(frame, area, store, spinner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Min(6)])
            .split(area);

        render_ticket(frame, chunks[0], ticket, store.tickets.update_loading, spinner);

        let comments = if store.comments.ticket_id == Some(ticket.id) {
            store.comments.comments.as_slice()
        } else {
            &[]
        };
        self.thread.render(
            frame,
            chunks[1],
            comments,
            store.auth.user_id(),
            store.comments.loading,
            store.comments.submitting,
            spinner,
        );

        self.picker.render(frame, area);
        self.confirm.render(frame, area);
    }

    fn render_placeholder(&self, frame: &mut Frame, area: Rect, store: &Store, spinner: &LoadingIndicator) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(false));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if store.tickets.loading {
            spinner.render(frame, inner, "Loading ticket...");
            return;
        }
        let (message, color) = match store.tickets.error.as_deref() {
            Some(error) => (error.to_string(), Color::Red),
            None => ("Ticket not found".to_string(), Color::Yellow),
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(color))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
    }
}

fn loading_or_empty(loading: bool, what: &str) -> String {
    if loading {
        format!("Loading {}...", what)
    } else {
        format!("No {} available", what)
    }
}

fn render_ticket(frame: &mut Frame, area: Rect, ticket: &Ticket, updating: bool, spinner: &LoadingIndicator) {
    let title = format!(" #{} {} ", ticket.id, ticket.subject);
    let block = Block::default()
        .title(Span::styled(title, theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(false));

    let label = |text: &'static str| Span::styled(format!("{:<12}", text), Style::default().fg(theme::MUTED));
    let status = ticket.status_label();
    let priority = ticket.priority_label();

    let created_by = if ticket.created_by_name.is_empty() {
        ticket.created_by_email.clone()
    } else {
        format!("{} <{}>", ticket.created_by_name, ticket.created_by_email)
    };

    let mut lines = vec![
        Line::from(vec![
            label("Status"),
            Span::styled(
                status.to_string(),
                Style::default()
                    .fg(theme::status_color(status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            label("Priority"),
            Span::styled(
                format!("{} {}", theme::priority_indicator(priority), priority),
                Style::default().fg(theme::priority_color(priority)),
            ),
        ]),
        Line::from(vec![label("Assignee"), Span::raw(ticket.assignee_label().to_string())]),
        Line::from(vec![label("Opened by"), Span::raw(created_by)]),
        Line::from(vec![label("Created"), Span::raw(format_timestamp(&ticket.created_at))]),
    ];
    if let Some(updated) = &ticket.updated_at {
        lines.push(Line::from(vec![label("Updated"), Span::raw(format_timestamp(updated))]));
    }
    if updating {
        lines.push(Line::from(Span::styled(
            spinner.text("Saving..."),
            Style::default().fg(Color::Cyan),
        )));
    }
    lines.push(Line::from(""));
    lines.extend(ticket.description.lines().map(|l| Line::from(l.to_string())));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
