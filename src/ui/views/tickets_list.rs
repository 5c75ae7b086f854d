//! Ticket list screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::api::types::{Role, Ticket};
use crate::ui::components::{format_timestamp, LoadingIndicator};
use crate::ui::theme;

/// Whether a ticket should be flagged for the viewer.
///
/// Admins care about tickets nobody owns; agents and customers about
/// tickets that are still open.
pub fn needs_attention(ticket: &Ticket, role: Role) -> bool {
    match role {
        Role::Admin => !ticket.is_assigned(),
        Role::Agent | Role::Customer => !ticket.is_closed(),
    }
}

/// Actions returned from the ticket list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketListAction {
    Open(i64),
    Refresh,
}

/// The ticket list.
#[derive(Debug, Default)]
pub struct TicketListView {
    selected: usize,
}

impl TicketListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Handle keyboard input against the current list.
    pub fn handle_input(&mut self, key: KeyEvent, tickets: &[Ticket]) -> Option<TicketListAction> {
        let last = tickets.len().saturating_sub(1);
        self.selected = self.selected.min(last);

        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.selected = (self.selected + 1).min(last);
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => {
                self.selected = 0;
                None
            }
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
                self.selected = last;
                None
            }
            (KeyCode::Enter, _) => tickets
                .get(self.selected)
                .map(|t| TicketListAction::Open(t.id)),
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(TicketListAction::Refresh),
            _ => None,
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        tickets: &[Ticket],
        role: Role,
        loading: bool,
        spinner: &LoadingIndicator,
    ) {
        let block = Block::default()
            .title(Span::styled(
                format!(" Tickets ({}) ", tickets.len()),
                theme::title_style(),
            ))
            .borders(Borders::ALL)
            .border_style(theme::border_style(false));

        if loading {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            spinner.render(frame, inner, "Loading tickets...");
            return;
        }

        if tickets.is_empty() {
            let hint = if role == Role::Customer {
                "No tickets to show. Press [n] to open one."
            } else {
                "No tickets to show right now."
            };
            frame.render_widget(
                Paragraph::new(hint)
                    .style(Style::default().fg(theme::MUTED))
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
            return;
        }

        self.selected = self.selected.min(tickets.len() - 1);

        let header = Row::new(["", "#", "Subject", "Status", "Priority", "Assignee", "Created"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows = tickets.iter().map(|t| {
            let flag = if needs_attention(t, role) {
                Cell::from("●").style(Style::default().fg(Color::Red))
            } else {
                Cell::from(" ")
            };
            Row::new(vec![
                flag,
                Cell::from(t.id.to_string()),
                Cell::from(t.subject.clone()),
                Cell::from(t.status_label().to_string())
                    .style(Style::default().fg(theme::status_color(t.status_label()))),
                Cell::from(format!(
                    "{} {}",
                    theme::priority_indicator(t.priority_label()),
                    t.priority_label()
                ))
                .style(Style::default().fg(theme::priority_color(t.priority_label()))),
                Cell::from(t.assignee_label().to_string()),
                Cell::from(format_timestamp(&t.created_at))
                    .style(Style::default().fg(theme::MUTED)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(6),
                Constraint::Min(20),
                Constraint::Length(13),
                Constraint::Length(10),
                Constraint::Length(18),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .block(block)
        .highlight_style(theme::highlight_style())
        .highlight_symbol("> ");

        let mut state = TableState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tickets() -> Vec<Ticket> {
        (1..=3).map(|id| fixtures::ticket(id, "T")).collect()
    }

    #[test]
    fn test_needs_attention_admin_unassigned() {
        let mut ticket = fixtures::ticket(1, "T");
        assert!(needs_attention(&ticket, Role::Admin));
        ticket.assigned_to = Some(3);
        assert!(!needs_attention(&ticket, Role::Admin));
    }

    #[test]
    fn test_needs_attention_open_for_others() {
        let mut ticket = fixtures::ticket(1, "T");
        ticket.assigned_to = Some(3);
        assert!(needs_attention(&ticket, Role::Agent));
        assert!(needs_attention(&ticket, Role::Customer));
        ticket.status_name = Some("Closed".to_string());
        assert!(!needs_attention(&ticket, Role::Agent));
        assert!(!needs_attention(&ticket, Role::Customer));
    }

    #[test]
    fn test_navigation_and_open() {
        let tickets = tickets();
        let mut view = TicketListView::new();
        view.handle_input(key(KeyCode::Char('j')), &tickets);
        view.handle_input(key(KeyCode::Char('j')), &tickets);
        view.handle_input(key(KeyCode::Char('j')), &tickets);
        assert_eq!(view.selected(), 2);
        assert_eq!(
            view.handle_input(key(KeyCode::Enter), &tickets),
            Some(TicketListAction::Open(3))
        );
        view.handle_input(key(KeyCode::Char('g')), &tickets);
        assert_eq!(view.selected(), 0);
    }

    #[test]
    fn test_enter_on_empty_list() {
        let mut view = TicketListView::new();
        assert_eq!(view.handle_input(key(KeyCode::Enter), &[]), None);
    }

    #[test]
    fn test_selection_clamped_when_list_shrinks() {
        let mut view = TicketListView::new();
        view.handle_input(key(KeyCode::Char('G')), &tickets());
        let shorter = vec![fixtures::ticket(9, "Only")];
        assert_eq!(
            view.handle_input(key(KeyCode::Enter), &shorter),
            Some(TicketListAction::Open(9))
        );
    }

    #[test]
    fn test_refresh() {
        let mut view = TicketListView::new();
        assert_eq!(
            view.handle_input(key(KeyCode::Char('r')), &[]),
            Some(TicketListAction::Refresh)
        );
    }
}
