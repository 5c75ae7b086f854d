//! Fallback screen for unknown routes.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

pub fn render(frame: &mut Frame, area: Rect, path: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("404 - Page not found", theme::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            format!("Nothing lives at {}", path),
            Style::default().fg(theme::MUTED),
        )),
        Line::from(""),
        Line::from("Press [d] for the dashboard or [t] for tickets"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(theme::border_style(false))),
        area,
    );
}
