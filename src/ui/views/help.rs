//! Help screen listing keyboard shortcuts.
//!
//! Opened with `?` from any screen outside a text field, closed with `?`,
//! `q` or Escape.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::events::HELP_SECTIONS;
use crate::ui::theme;

/// Actions that can be returned from the help view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpAction {
    Close,
}

/// The help panel.
#[derive(Debug, Default)]
pub struct HelpView {
    scroll: usize,
    /// Visible height, updated on render.
    visible_height: usize,
}

impl HelpView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    fn total_lines() -> usize {
        // Header and blank line per section, one line per binding, one
        // trailing blank, then the footer.
        HELP_SECTIONS
            .iter()
            .map(|s| s.bindings.len() + 3)
            .sum::<usize>()
            + 1
    }

    fn max_scroll(&self) -> usize {
        Self::total_lines().saturating_sub(self.visible_height)
    }

    /// Handle keyboard input. All keys are consumed while help is open.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<HelpAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('?'), _) | (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => {
                return Some(HelpAction::Close)
            }
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) => self.scroll = 0,
            (KeyCode::Char('G'), _) => self.scroll = self.max_scroll(),
            _ => {}
        }
        None
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Help - Keyboard Shortcuts ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.visible_height = inner.height as usize;
        self.scroll = self.scroll.min(self.max_scroll());

        let mut lines: Vec<Line<'static>> = Vec::new();
        for section in HELP_SECTIONS {
            lines.push(Line::from(Span::styled(
                format!("── {} ──", section.title),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            for (key, description) in section.bindings {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:>16}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::raw(*description),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "Press ?, q, or Esc to close",
            Style::default().fg(theme::MUTED),
        )));

        frame.render_widget(Paragraph::new(lines).scroll((self.scroll as u16, 0)), inner);

        if self.max_scroll() > 0 {
            let mut state = ScrollbarState::new(self.max_scroll()).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut state,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_close_keys() {
        let mut view = HelpView::new();
        for code in [KeyCode::Char('?'), KeyCode::Char('q'), KeyCode::Esc] {
            assert_eq!(view.handle_input(key(code)), Some(HelpAction::Close));
        }
    }

    #[test]
    fn test_scroll_bounds() {
        let mut view = HelpView::new();
        view.visible_height = 10;
        for _ in 0..500 {
            view.handle_input(key(KeyCode::Char('j')));
        }
        assert_eq!(view.scroll, view.max_scroll());

        view.handle_input(key(KeyCode::Char('g')));
        assert_eq!(view.scroll, 0);
        view.handle_input(key(KeyCode::Char('k')));
        assert_eq!(view.scroll, 0);
    }

    #[test]
    fn test_reset_scroll() {
        let mut view = HelpView::new();
        view.scroll = 4;
        view.reset_scroll();
        assert_eq!(view.scroll, 0);
    }

    #[test]
    fn test_total_lines_counts_bindings() {
        assert!(HelpView::total_lines() > HELP_SECTIONS.len() * 3);
    }
}
