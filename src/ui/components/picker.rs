//! List picker popup.
//!
//! Used to choose a status, a priority or an agent on the ticket detail
//! screen. Items carry the server id that is sent back when selected.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::modal::centered_rect;
use crate::ui::theme;

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub id: i64,
    pub label: String,
    pub color: Color,
}

impl PickerItem {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            color: Color::White,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Action resulting from picker input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerAction {
    /// Select an item (id, label).
    Select(i64, String),
    Cancel,
}

/// A popup list for picking one item.
#[derive(Debug, Default)]
pub struct Picker {
    title: String,
    items: Vec<PickerItem>,
    selected: usize,
    visible: bool,
    /// Shown when there are no items.
    empty_message: String,
}

impl Picker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the picker, preselecting the item with `current` id if present.
    pub fn show(
        &mut self,
        title: impl Into<String>,
        items: Vec<PickerItem>,
        current: Option<i64>,
        empty_message: impl Into<String>,
    ) {
        self.selected = current
            .and_then(|id| items.iter().position(|item| item.id == id))
            .unwrap_or(0);
        self.title = title.into();
        self.items = items;
        self.empty_message = empty_message.into();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[cfg(test)]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn selected_item(&self) -> Option<&PickerItem> {
        self.items.get(self.selected)
    }

    /// Handle keyboard input.
    ///
    /// Returns an optional action to be handled by the parent view.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<PickerAction> {
        if !self.visible {
            return None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                if self.selected + 1 < self.items.len() {
                    self.selected += 1;
                }
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            (KeyCode::Enter, _) => {
                let item = self.items.get(self.selected)?;
                let action = PickerAction::Select(item.id, item.label.clone());
                self.hide();
                Some(action)
            }
            (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.hide();
                Some(PickerAction::Cancel)
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let height = (self.items.len() as u16 + 5).clamp(7, 16);
        let dialog_area = centered_rect(40.min(area.width.saturating_sub(4)), height, area);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        if self.items.is_empty() {
            frame.render_widget(
                Paragraph::new(self.empty_message.as_str())
                    .style(Style::default().fg(theme::MUTED))
                    .alignment(Alignment::Center),
                chunks[0],
            );
        } else {
            let items: Vec<ListItem> = self
                .items
                .iter()
                .map(|item| ListItem::new(item.label.as_str()).style(Style::default().fg(item.color)))
                .collect();
            let list = List::new(items)
                .highlight_style(theme::highlight_style())
                .highlight_symbol("> ");
            let mut state = ListState::default();
            state.select(Some(self.selected));
            frame.render_stateful_widget(list, chunks[0], &mut state);
        }

        let help = Line::from(vec![
            Span::styled("j/k", Style::default().fg(Color::Yellow)),
            Span::raw(": navigate  "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(": select  "),
            Span::styled("Esc", Style::default().fg(Color::Red)),
            Span::raw(": cancel"),
        ]);
        frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), chunks[1]);
    }
}
