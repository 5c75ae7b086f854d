//! Contextual help bar component.
//!
//! Displays the keyboard hints for the current screen in the footer.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::events::{get_context_hints, KeyContext};
use crate::ui::theme;

/// Render the hints for `context` as a single line.
pub fn render_context_help(frame: &mut Frame, area: Rect, context: KeyContext) {
    let line = Line::from(hint_spans(get_context_hints(context)));
    frame.render_widget(Paragraph::new(line), area);
}

/// Split `[key] description` hint text into styled spans.
///
/// Bracketed keys are highlighted; everything else is muted.
fn hint_spans(hints: &str) -> Vec<Span<'static>> {
    let key_style = Style::default().fg(Color::Cyan);
    let text_style = Style::default().fg(theme::MUTED);

    let mut spans = Vec::new();
    let mut rest = hints;
    while !rest.is_empty() {
        match (rest.find('['), rest.find(']')) {
            (Some(open), Some(close)) if open < close => {
                if open > 0 {
                    spans.push(Span::styled(rest[..open].to_string(), text_style));
                }
                spans.push(Span::styled(rest[open..=close].to_string(), key_style));
                rest = &rest[close + 1..];
            }
            _ => {
                spans.push(Span::styled(rest.to_string(), text_style));
                break;
            }
        }
    }
    spans
}
