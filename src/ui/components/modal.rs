//! Modal dialogs.
//!
//! The error dialog is the alert surface for failed mutations; while it is
//! visible it swallows all input except dismissal. The confirm dialog asks
//! before a status change is sent.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::error::AppError;

/// Create a rectangle of the given size centered in `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// A blocking error alert.
#[derive(Debug, Clone, Default)]
pub struct ErrorDialog {
    title: String,
    message: String,
    visible: bool,
}

impl ErrorDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an application error.
    pub fn show(&mut self, error: &AppError) {
        self.show_message("Error", error.user_message());
    }

    /// Show a dialog with a custom title and message.
    pub fn show_message(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.title = title.into();
        self.message = message.into();
        self.visible = true;
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[cfg(test)]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let width = 60.min(area.width.saturating_sub(4));
        let inner_width = width.saturating_sub(4).max(1) as usize;
        let text_lines = self.message.chars().count().div_ceil(inner_width).max(1) as u16;
        let dialog_area = centered_rect(width, text_lines + 6, area);

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .margin(1)
            .split(inner);

        frame.render_widget(
            Paragraph::new(self.message.as_str())
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Enter/Esc", Style::default().fg(Color::Yellow)),
                Span::raw(": dismiss"),
            ]))
            .alignment(Alignment::Center),
            chunks[1],
        );
    }
}

/// Result of confirm dialog input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Confirm,
    Cancel,
}

/// A yes/no confirmation dialog.
#[derive(Debug, Clone, Default)]
pub struct ConfirmDialog {
    title: String,
    message: String,
    visible: bool,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.title = title.into();
        self.message = message.into();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Handle keyboard input.
    ///
    /// `y`/Enter confirms, `n`/Esc cancels; other keys are swallowed.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<ConfirmAction> {
        if !self.visible {
            return None;
        }
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => ConfirmAction::Confirm,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ConfirmAction::Cancel,
            _ => return None,
        };
        self.hide();
        Some(action)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let dialog_area = centered_rect(50.min(area.width.saturating_sub(4)), 7, area);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .margin(1)
            .split(inner);

        frame.render_widget(
            Paragraph::new(self.message.as_str())
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("y", Style::default().fg(Color::Green)),
                Span::raw(": confirm  "),
                Span::styled("n/Esc", Style::default().fg(Color::Red)),
                Span::raw(": cancel"),
            ]))
            .alignment(Alignment::Center),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_rect(40, 20, area), Rect::new(30, 15, 40, 20));
    }

    #[test]
    fn test_centered_rect_larger_than_area() {
        let area = Rect::new(5, 5, 30, 10);
        assert_eq!(centered_rect(50, 30, area), area);
    }

    #[test]
    fn test_error_dialog_show_dismiss() {
        let mut dialog = ErrorDialog::new();
        assert!(!dialog.is_visible());

        dialog.show_message("Error", "Failed to create ticket");
        assert!(dialog.is_visible());
        assert_eq!(dialog.message(), "Failed to create ticket");

        dialog.dismiss();
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_error_dialog_from_app_error() {
        let mut dialog = ErrorDialog::new();
        dialog.show(&AppError::other("Something went wrong"));
        assert_eq!(dialog.title(), "Error");
        assert_eq!(dialog.message(), "Something went wrong");
    }

    #[test]
    fn test_confirm_dialog_confirm() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("Change Status", "Set status to Closed?");
        assert_eq!(
            dialog.handle_input(key(KeyCode::Char('y'))),
            Some(ConfirmAction::Confirm)
        );
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_confirm_dialog_cancel() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("Change Status", "Set status to Closed?");
        assert_eq!(dialog.handle_input(key(KeyCode::Esc)), Some(ConfirmAction::Cancel));
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_confirm_dialog_swallows_other_keys() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("t", "m");
        assert_eq!(dialog.handle_input(key(KeyCode::Char('x'))), None);
        assert!(dialog.is_visible());
    }

    #[test]
    fn test_confirm_dialog_hidden_ignores_input() {
        let mut dialog = ConfirmDialog::new();
        assert_eq!(dialog.handle_input(key(KeyCode::Enter)), None);
    }
}
