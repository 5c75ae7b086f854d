//! New ticket form (customers).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::types::CreateTicketRequest;
use crate::ui::components::{LoadingIndicator, TextEditor, TextInput};
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Subject,
    Description,
}

/// Actions returned from the create ticket form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateTicketAction {
    Submit(CreateTicketRequest),
    Cancel,
}

/// The create ticket form.
#[derive(Debug)]
pub struct CreateTicketView {
    subject: TextInput,
    description: TextEditor,
    focus: Field,
    validation: Option<String>,
}

impl Default for CreateTicketView {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateTicketView {
    pub fn new() -> Self {
        Self {
            subject: TextInput::new().with_placeholder("Short summary of the problem"),
            description: TextEditor::new().with_placeholder("Describe what happened..."),
            focus: Field::Subject,
            validation: None,
        }
    }

    /// Clear the form after a successful submit.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    fn submit(&mut self) -> Option<CreateTicketAction> {
        let subject = self.subject.value().trim();
        if subject.is_empty() {
            self.validation = Some("Subject is required".to_string());
            self.focus = Field::Subject;
            return None;
        }
        if self.description.is_blank() {
            self.validation = Some("Description is required".to_string());
            self.focus = Field::Description;
            return None;
        }
        self.validation = None;
        Some(CreateTicketAction::Submit(CreateTicketRequest::new(
            subject,
            self.description.content().trim(),
        )))
    }

    /// Handle keyboard input. Input is ignored while the ticket is being created.
    pub fn handle_input(&mut self, key: KeyEvent, submitting: bool) -> Option<CreateTicketAction> {
        if submitting {
            return None;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => self.submit(),
            (KeyCode::Esc, _) => Some(CreateTicketAction::Cancel),
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                self.focus = match self.focus {
                    Field::Subject => Field::Description,
                    Field::Description => Field::Subject,
                };
                None
            }
            (KeyCode::Enter, _) if self.focus == Field::Subject => {
                self.focus = Field::Description;
                None
            }
            _ => {
                let changed = match self.focus {
                    Field::Subject => self.subject.handle_input(key),
                    Field::Description => self.description.handle_input(key),
                };
                if changed {
                    self.validation = None;
                }
                None
            }
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        submitting: bool,
        spinner: &LoadingIndicator,
    ) {
        let block = Block::default()
            .title(Span::styled(" New ticket ", theme::title_style()))
            .borders(Borders::ALL)
            .border_style(theme::border_style(false));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(inner);

        self.subject
            .render(frame, chunks[0], "Subject", !submitting && self.focus == Field::Subject);
        self.description.render(
            frame,
            chunks[1],
            "Description",
            !submitting && self.focus == Field::Description,
        );

        let status = if submitting {
            Paragraph::new(spinner.text("Creating ticket...")).style(Style::default().fg(Color::Cyan))
        } else if let Some(message) = &self.validation {
            Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red))
        } else {
            Paragraph::new("New tickets start as Open with Low priority")
                .style(Style::default().fg(theme::MUTED))
        };
        frame.render_widget(status.alignment(Alignment::Left), chunks[2]);
    }
}
